use crate::app::{OleEditorApp, OleSession, colors};
use eframe::egui;
use olelib::{EntryKind, EntryNode};
use std::fmt::Write;

/// Entry name with control characters (e.g. the `\x05` prefix of property set
/// streams) written as escapes
pub fn display_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_control() {
            let _ = write!(out, "\\x{:02X}", u32::from(ch));
        } else {
            out.push(ch);
        }
    }
    out
}

/// Group digits in threes: 1234567 -> "1 234 567"
fn format_with_separators(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Draw `node`'s children. Returns the path of a stream clicked this frame.
fn show_children(
    ui: &mut egui::Ui,
    node: &EntryNode,
    selected: Option<&[String]>,
) -> Option<Vec<String>> {
    let mut clicked = None;

    for child in &node.children {
        match child.kind {
            EntryKind::Storage => {
                let header = egui::CollapsingHeader::new(display_name(&child.name))
                    .id_salt(("storage", &child.path))
                    .show(ui, |ui| show_children(ui, child, selected));
                if let Some(path) = header.body_returned.flatten() {
                    clicked = Some(path);
                }
            }
            EntryKind::Stream => {
                let is_selected = selected == Some(child.path.as_slice());
                let response = ui
                    .selectable_label(is_selected, display_name(&child.name))
                    .on_hover_text(format!("{} bytes", format_with_separators(child.size)));
                if response.clicked() && !is_selected {
                    clicked = Some(child.path.clone());
                }
            }
            _ => {}
        }
    }

    clicked
}

impl OleSession {
    fn show_file_info(&self, ui: &mut egui::Ui) {
        egui::Grid::new("file_info_grid")
            .num_columns(2)
            .spacing([20.0, 4.0])
            .show(ui, |ui| {
                ui.label("File Name");
                ui.add(egui::Label::new(&self.name).truncate())
                    .on_hover_text(self.ole.filepath.display().to_string());
                ui.end_row();

                ui.label("File Size");
                ui.label(format!("{} bytes", format_with_separators(self.ole.file_size())));
                ui.end_row();

                ui.label("Format");
                ui.label(format!(
                    "v{} ({} byte sectors)",
                    self.ole.major_version(),
                    self.ole.sector_size()
                ));
                ui.end_row();

                ui.label("Streams");
                ui.label(
                    self.tree
                        .as_ref()
                        .map_or(0, EntryNode::stream_count)
                        .to_string(),
                );
                ui.end_row();

                if let Some(clsid) = self.ole.root_clsid() {
                    ui.label("CLSID");
                    ui.label(egui::RichText::new(clsid).monospace().size(10.0));
                    ui.end_row();
                }
            });
    }
}

impl OleEditorApp {
    /// Show the side panel with the file information and the storage tree
    pub(crate) fn show_side_panel(&mut self, ctx: &egui::Context) {
        let Some(curr_session) = self.get_curr_session_mut() else {
            return;
        };

        egui::SidePanel::left("left_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.add_space(3.0);

                egui::CollapsingHeader::new("File Information")
                    .default_open(true)
                    .show(ui, |ui| curr_session.show_file_info(ui));

                ui.separator();

                let mut clicked = None;
                egui::ScrollArea::both()
                    .auto_shrink([false, false])
                    .show(ui, |ui| match &curr_session.tree {
                        Some(root) => {
                            let label = egui::RichText::new(display_name(&root.name))
                                .color(colors::GRAY_160);
                            ui.label(label);
                            clicked = show_children(ui, root, curr_session.selected.as_deref());
                        }
                        None => {
                            ui.label("No root entry");
                        }
                    });

                if let Some(path) = clicked {
                    curr_session.select_stream(&path);
                }
            });
    }
}
