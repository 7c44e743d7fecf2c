use eframe::egui;

/// Smallest handle length in pixels
const MIN_HANDLE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Scrollbar over a range of `0..=max` offsets with `page` units visible at once.
/// Units are whatever the caller scrolls by: lines for the vertical bar, pixels for
/// the horizontal one.
pub struct Scrollbar {
    id: egui::Id,
    axis: Axis,
}

impl Scrollbar {
    pub const fn new(id: egui::Id, axis: Axis) -> Self {
        Self { id, axis }
    }

    /// Paint the bar inside `track` and return a new offset if it was clicked or dragged
    pub fn show(
        self,
        ui: &egui::Ui,
        track: egui::Rect,
        offset: f32,
        max: f32,
        page: f32,
    ) -> Option<f32> {
        if max <= 0.0 {
            return None;
        }

        // Thin bar that widens while hovered
        let is_hovered = ui.rect_contains_pointer(track);
        let expansion = ui.ctx().animate_bool(self.id.with("anim"), is_hovered);
        let thickness = egui::lerp(4.0..=10.0, expansion);
        let bar = match self.axis {
            Axis::Vertical => track.with_min_x(track.right() - thickness),
            Axis::Horizontal => track.with_min_y(track.bottom() - thickness),
        };
        let (bar_start, bar_len) = match self.axis {
            Axis::Vertical => (bar.top(), bar.height()),
            Axis::Horizontal => (bar.left(), bar.width()),
        };

        let handle_len = (page / (max + page) * bar_len).max(MIN_HANDLE).min(bar_len);
        let travel = bar_len - handle_len;
        let handle_start = bar_start + (offset / max).clamp(0.0, 1.0) * travel;

        let response = ui.interact(bar, self.id.with("bar"), egui::Sense::click_and_drag());
        let mut new_offset = None;
        if (response.clicked() || response.dragged())
            && let Some(pointer) = ui.input(|i| i.pointer.hover_pos())
            && travel > 0.0
        {
            // Center the handle on the pointer
            let along = match self.axis {
                Axis::Vertical => pointer.y,
                Axis::Horizontal => pointer.x,
            };
            let t = ((along - bar_start - handle_len / 2.0) / travel).clamp(0.0, 1.0);
            new_offset = Some(t * max);
        }

        let track_color = ui.visuals().extreme_bg_color;
        ui.painter()
            .rect_filled(bar, 2.0, track_color.gamma_multiply(expansion));

        let handle = match self.axis {
            Axis::Vertical => egui::Rect::from_min_size(
                egui::pos2(bar.left(), handle_start),
                egui::vec2(thickness, handle_len),
            ),
            Axis::Horizontal => egui::Rect::from_min_size(
                egui::pos2(handle_start, bar.top()),
                egui::vec2(handle_len, thickness),
            ),
        };
        let handle_color = if response.dragged() {
            ui.visuals().widgets.active.bg_fill
        } else if is_hovered {
            ui.visuals().widgets.hovered.bg_fill
        } else {
            ui.visuals().widgets.inactive.bg_fill
        };
        ui.painter().rect_filled(handle, 2.0, handle_color);

        new_offset
    }
}

/// Whole lines to scroll for an accumulated wheel delta. Any noticeable movement
/// scrolls at least one line.
#[allow(clippy::cast_possible_truncation)]
pub fn wheel_lines(delta_y: f32, line_height: f32) -> isize {
    if delta_y.abs() <= 0.4 || line_height <= 0.0 {
        return 0;
    }
    let lines = (delta_y.abs() / line_height).round().max(1.0) as isize;
    // Wheel up (positive delta) moves towards the start
    if delta_y > 0.0 { -lines } else { lines }
}
