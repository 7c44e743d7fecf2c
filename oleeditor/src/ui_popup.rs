use crate::app::{OleEditorApp, colors};
use crate::events::collect_ui_events;
use eframe::egui;

//  ========================== Popup Type logic ============================= //

#[derive(Clone, PartialEq, Eq)]
pub enum PopupType {
    Error,
    About,
}

impl PopupType {
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::About => "About",
        }
    }
}

//  ========================== Popup logic =================================== //

#[derive(Default)]
pub struct Popup {
    /// Is there a pop-up
    pub(crate) active: bool,
    /// Type of the pop-up. Used to determine the title and content of the window.
    pub(crate) ptype: Option<PopupType>,
}

impl Popup {
    pub const fn open(&mut self, ptype: PopupType) {
        self.active = true;
        self.ptype = Some(ptype);
    }

    /// Clear (aka remove) the pop-up
    pub const fn clear(&mut self) {
        self.active = false;
        self.ptype = None;
    }
}

//  ========================== OleEditor logic ============================= //

impl OleEditorApp {
    fn display_error(ui: &mut egui::Ui, msg: &str) -> bool {
        ui.label(msg);

        // Add space before close button
        ui.add_space(10.0);

        ui.button(" OK ").clicked()
    }

    fn display_about(ui: &mut egui::Ui) -> bool {
        ui.vertical(|ui| {
            ui.add_space(5.0);

            ui.heading("OLE Editor");
            ui.label("An OLE structured storage file viewer");

            ui.add_space(3.0);
            ui.separator();
            ui.add_space(3.0);

            ui.label(
                "Open a compound file (.doc, .xls, .msg, ...) to browse its storages \
            and inspect any stream as hex and ASCII. Select bytes with the mouse and \
            copy them with Ctrl+C.",
            );

            ui.add_space(3.0);
            ui.separator();
            ui.add_space(3.0);

            ui.label(format!("v{}", env!("CARGO_PKG_VERSION")));
            ui.add_space(5.0);
        });

        // Keep the window open
        false
    }

    /// Show the pop-up
    pub(crate) fn show_popup(&mut self, ctx: &egui::Context) {
        let content_rect = ctx.content_rect();

        // Block interaction with the app
        egui::Area::new(egui::Id::from("modal_blocker"))
            .order(egui::Order::Background)
            .fixed_pos(content_rect.left_top())
            .show(ctx, |ui| {
                ui.allocate_rect(content_rect, egui::Sense::click());

                // Collect input events once per frame and store in the app state
                *self.events.borrow_mut() = collect_ui_events(ui);
            });

        // Darken the background
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Background,
            egui::Id::new("modal_bg"),
        ));
        painter.rect_filled(content_rect, 0.0, colors::SHADOW);

        let mut is_open = self.popup.active;
        let was_open = self.popup.active;

        let Some(popup_type) = self.popup.ptype.clone() else {
            self.popup.clear();
            return;
        };

        let window = egui::Window::new(popup_type.title())
            .open(&mut is_open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0]);

        // Track OK button press
        let mut close_confirm = false;

        window.show(ctx, |ui| match popup_type {
            PopupType::Error => {
                let error = self.error.borrow().clone().unwrap_or_default();
                close_confirm = Self::display_error(ui, &error);
            }
            PopupType::About => close_confirm = Self::display_about(ui),
        });

        let events = *self.events.borrow();
        self.popup.active =
            !close_confirm && is_open && !events.escape_pressed && !events.enter_released;

        // If the window got closed this frame
        if was_open && !self.popup.active {
            *self.error.borrow_mut() = None;
            self.popup.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_open_and_clear() {
        let mut popup = Popup::default();
        assert!(!popup.active);

        popup.open(PopupType::About);
        assert!(popup.active);
        assert!(popup.ptype == Some(PopupType::About));
        assert_eq!(PopupType::Error.title(), "Error");

        popup.clear();
        assert!(!popup.active);
        assert!(popup.ptype.is_none());
    }
}
