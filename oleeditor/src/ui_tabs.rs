use crate::app::OleEditorApp;
use crate::ui_button;
use eframe::egui;

/// Room for the file name margins and the close button
const TAB_PADDING: f32 = 32.0;

/// Shrink `ideal` widths proportionally so they fit into `available`.
/// Widths are never scaled up.
fn fit_widths(ideal: &[f32], available: f32) -> Vec<f32> {
    let total: f32 = ideal.iter().sum();
    if total <= available || total <= 0.0 {
        return ideal.to_vec();
    }
    let scale = (available / total).max(0.0);
    ideal.iter().map(|w| (w * scale).floor()).collect()
}

impl OleEditorApp {
    #[allow(clippy::cast_precision_loss)]
    /// Width of each tab so that all of them and the "+" button fit on one row
    fn tab_widths(&self, ui: &egui::Ui, spacing: f32) -> Vec<f32> {
        let font_id = egui::TextStyle::Body.resolve(ui.style());

        let ideal: Vec<f32> = self
            .sessions
            .iter()
            .map(|session| {
                let galley = ui.painter().layout_no_wrap(
                    session.name.clone(),
                    font_id.clone(),
                    ui.visuals().widgets.active.text_color(),
                );
                galley.size().x + TAB_PADDING
            })
            .collect();

        let add_button_width = if self.sessions.len() < self.settings.max_tabs {
            70.0
        } else {
            35.0
        };
        let total_spacing = spacing * self.sessions.len() as f32;

        fit_widths(&ideal, ui.available_width() - add_button_width - total_spacing)
    }

    /// Show one tab per open file. A "+" tab opens more files while there is room.
    pub(crate) fn show_tabs(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("tabs_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut tab_to_close = None;

                let spacing = 2.0;
                ui.spacing_mut().item_spacing.x = spacing;

                let widths = self.tab_widths(ui, spacing);

                for (i, (session, width)) in self.sessions.iter().zip(widths).enumerate() {
                    let is_active = Some(i) == self.active_index;

                    let (response, close_clicked) =
                        ui_button::tab_button(ui, ("tab", i), is_active, width, |ui| {
                            let name = egui::RichText::new(&session.name);
                            ui.add(egui::Label::new(name).truncate());

                            ui.scope(|ui| {
                                ui.visuals_mut().widgets.inactive.weak_bg_fill =
                                    egui::Color32::TRANSPARENT;
                                ui.button("×").clicked()
                            })
                            .inner
                        });

                    if close_clicked {
                        tab_to_close = Some(i);
                    } else if response
                        .on_hover_text(session.ole.filepath.display().to_string())
                        .clicked()
                    {
                        self.active_index = Some(i);
                    }
                }

                // Close after the loop, the sessions are borrowed above
                if let Some(i) = tab_to_close {
                    self.close_file(i);
                }

                if self.sessions.len() < self.settings.max_tabs {
                    let (response, ()) = ui_button::tab_button(ui, "add_tab", false, 0.0, |ui| {
                        ui.label(egui::RichText::new(" + ").strong());
                    });
                    if response.on_hover_text("Open File").clicked() {
                        self.open_file_dialog();
                    }
                }
            });
        });
    }
}
