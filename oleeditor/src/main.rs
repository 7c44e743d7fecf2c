#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
// Tell OS to hide the console window when running.
// This attribute is only applied if the target OS is Windows.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod blink;
mod events;
mod fonts;
mod hexlayout;
mod hexview;
mod loader;
mod textcursor;
mod ui_button;
mod ui_filedrop;
mod ui_hexview;
mod ui_menubar;
mod ui_oletree;
mod ui_popup;
mod ui_scrollarea;
mod ui_tabs;

use crate::ui_popup::PopupType;
use app::{AppSettings, OleEditorApp};
use eframe::egui;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Files given on the command line are opened on start
    let files: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    let settings = AppSettings::default();
    let options = eframe::NativeOptions {
        vsync: true,
        viewport: egui::ViewportBuilder::default()
            .with_resizable(true)
            .with_inner_size(settings.window_size),
        ..Default::default()
    };
    eframe::run_native(
        "OLE Editor",
        options,
        Box::new(move |cc| {
            let mut definitions = egui::FontDefinitions::default();
            fonts::install_preferred_font(&mut definitions, &fonts::SystemFonts::default());
            let mut app = OleEditorApp::new(&definitions);
            cc.egui_ctx.set_fonts(definitions);
            app.pending_files = files;
            Ok(Box::new(app))
        }),
    )
}

impl eframe::App for OleEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.measure_glyph(ctx);

        // Command line files wait for the font to be measured
        for path in std::mem::take(&mut self.pending_files) {
            self.load_file(&path);
        }

        self.show_menu_bar(ctx);

        if self.error.borrow().is_some() {
            self.popup.open(PopupType::Error);
        }

        self.show_tabs(ctx);
        self.show_side_panel(ctx);

        self.handle_drag_and_drop(ctx);

        // If pop active - show it and return (don't display the hex view)
        if self.popup.active {
            self.show_popup(ctx);
            return;
        }

        let font = self.font.clone();
        if let Some(curr_session) = self.get_curr_session_mut() {
            curr_session.show_central_panel(ctx, &font);
        } else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label("Drop a file or use File > Open");
                });
            });
        }
    }
}
