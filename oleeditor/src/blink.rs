/// Caret blink period in seconds
pub const BLINK_PERIOD: f64 = 0.5;

/// Cooperative caret blink timer driven by the frame clock.
/// The host calls `on_tick` with the current time and schedules the next
/// repaint after `next_toggle_in`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorBlink {
    running: bool,
    visible: bool,
    last_toggle: f64,
}

impl Default for CursorBlink {
    fn default() -> Self {
        Self {
            running: false,
            visible: true,
            last_toggle: 0.0,
        }
    }
}

impl CursorBlink {
    /// (Re)start blinking with the caret shown
    pub const fn start(&mut self, now: f64) {
        self.running = true;
        self.visible = true;
        self.last_toggle = now;
    }

    /// Stop blinking and leave the caret shown
    pub const fn stop(&mut self) {
        self.running = false;
        self.visible = true;
    }

    /// Advance the timer. Returns `true` if visibility toggled.
    pub fn on_tick(&mut self, now: f64) -> bool {
        if !self.running || now - self.last_toggle < BLINK_PERIOD {
            return false;
        }
        self.visible = !self.visible;
        self.last_toggle = now;
        true
    }

    /// Seconds until the next toggle, `None` while stopped
    pub fn next_toggle_in(&self, now: f64) -> Option<f64> {
        self.running
            .then(|| (BLINK_PERIOD - (now - self.last_toggle)).max(0.0))
    }

    #[cfg(test)]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}
