use crate::app::OleEditorApp;
use eframe::egui;

impl OleEditorApp {
    /// Handle drag and drop events:
    /// - While files are dragged over the window, cover the central panel with a hint.
    /// - Every dropped file with a local path is opened in its own tab.
    /// - Nothing happens while a pop-up is shown.
    pub(crate) fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        if self.popup.active {
            return;
        }

        let hovered = ctx.input(|i| i.raw.hovered_files.len());
        if hovered > 0 {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    let text = if hovered == 1 {
                        "Drop file to open".to_string()
                    } else {
                        format!("Drop {hovered} files to open")
                    };
                    ui.heading(text);
                });
            });
        }

        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        for path in dropped {
            log::debug!("Dropped '{}'", path.display());
            self.load_file(&path);
        }
    }
}
