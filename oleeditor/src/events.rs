use eframe::egui;

#[derive(Default, Clone, Copy)]
pub struct EventState {
    /// Platform copy shortcut (Ctrl+C / Cmd+C)
    pub(crate) copy_requested: bool,
    pub(crate) escape_pressed: bool,
    pub(crate) enter_released: bool,
    /// Accumulated wheel / touchpad scroll in points
    pub(crate) scroll_delta: egui::Vec2,
    /// Frame time in seconds
    pub(crate) time: f64,
}

/// Collect events once per frame and return an aggregated state
pub fn collect_ui_events(ui: &egui::Ui) -> EventState {
    ui.input(|i| {
        let mut state = EventState {
            scroll_delta: i.smooth_scroll_delta,
            time: i.time,
            ..Default::default()
        };

        for event in &i.events {
            match event {
                egui::Event::Copy => state.copy_requested = true,
                egui::Event::Key {
                    key: egui::Key::Enter,
                    pressed: false,
                    ..
                } => state.enter_released = true,
                _ => {}
            }
        }

        // Direct query for Escape pressed this frame
        state.escape_pressed = i.key_pressed(egui::Key::Escape);

        state
    })
}
