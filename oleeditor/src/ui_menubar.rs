use crate::app::OleEditorApp;
use crate::ui_hexview::EguiClipboard;
use crate::ui_popup::PopupType;
use eframe::egui;

impl OleEditorApp {
    /// Ask for one or more files and open each of them
    pub(crate) fn open_file_dialog(&mut self) {
        let Some(paths) = rfd::FileDialog::new()
            .set_title("Open File")
            .add_filter("All Files", &["*"])
            .pick_files()
        else {
            return;
        };

        for path in paths {
            self.load_file(&path);
        }
    }

    /// Displays the top menu bar with File, Edit and Help menus
    pub(crate) fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menubar").show(ctx, |ui| {
            ui.add_space(3.0);

            egui::MenuBar::new().ui(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.menu_button("File", |ui| {
                        if ui.button("Open...").clicked() {
                            self.open_file_dialog();
                        }

                        if ui
                            .add_enabled(self.active_index.is_some(), egui::Button::new("Close"))
                            .clicked()
                            && let Some(index) = self.active_index
                        {
                            self.close_file(index);
                        }

                        ui.separator();

                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });

                    ui.menu_button("Edit", |ui| {
                        let can_copy = self
                            .get_curr_session()
                            .is_some_and(|s| s.view.has_selection());

                        if ui
                            .add_enabled(can_copy, egui::Button::new("Copy"))
                            .clicked()
                            && let Some(curr_session) = self.get_curr_session()
                        {
                            curr_session.view.copy(&mut EguiClipboard(ctx));
                        }
                    });

                    ui.menu_button("Help", |ui| {
                        if ui.button("About").clicked() {
                            self.popup.open(PopupType::About);
                        }
                    });
                });
            });

            ui.add_space(2.0);
        });
    }
}
