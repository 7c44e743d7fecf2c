use eframe::egui;

/// Horizontal inner margin of a tab, per side
const TAB_MARGIN_X: i8 = 6;

/// Background and text color of a tab in the given state
fn tab_colors(
    visuals: &egui::Visuals,
    is_active: bool,
    is_hovered: bool,
) -> (egui::Color32, egui::Color32) {
    let widgets = &visuals.widgets;
    if is_active {
        (widgets.active.bg_fill, widgets.active.fg_stroke.color)
    } else if is_hovered {
        (widgets.hovered.bg_fill, widgets.inactive.fg_stroke.color)
    } else {
        (widgets.noninteractive.bg_fill, widgets.inactive.fg_stroke.color)
    }
}

/// Frame that looks like a tab and is clickable as a whole.
/// Returns the click response of the frame and the result of `add_contents`.
pub fn tab_button<R>(
    ui: &mut egui::Ui,
    id_salt: impl std::hash::Hash,
    is_active: bool,
    fixed_width: f32,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> (egui::Response, R) {
    let id = ui.make_persistent_id(id_salt);

    // Hover is tested on a slightly taller rect so the bottom edge of the tab reacts too
    let mut hover_rect = ui.max_rect();
    hover_rect.max.y += 10.0;
    let is_hovered = ui.rect_contains_pointer(hover_rect)
        && ui.interact(hover_rect, id, egui::Sense::hover()).hovered();

    let (fill, text_color) = tab_colors(ui.visuals(), is_active, is_hovered);

    let inner = egui::Frame::new()
        .fill(fill)
        .corner_radius(4.0)
        .inner_margin(egui::Margin::symmetric(TAB_MARGIN_X, 4))
        .show(ui, |ui| {
            if fixed_width > 0.0 {
                ui.set_width(fixed_width - 2.0 * f32::from(TAB_MARGIN_X));
            }

            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 8.0;

                // Labels must not take the pointer from the frame
                ui.style_mut().interaction.selectable_labels = false;
                ui.visuals_mut().override_text_color = Some(text_color);

                add_contents(ui)
            })
            .inner
        });

    let response = ui.interact(inner.response.rect, id, egui::Sense::click());
    (response, inner.inner)
}
