use crate::app::{OleEditorApp, OleSession};
use crate::hexview::HexView;
use eframe::egui;
use olelib::OleFile;
use std::path::Path;

impl OleEditorApp {
    /// Open a compound file and add it to the list of opened sessions.
    /// If the file is already open, switch to it.
    /// If the maximum number of tabs is reached, display an error message.
    pub(crate) fn load_file(&mut self, path: &Path) {
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        // Check if the file is already open
        if let Some(index) = self.sessions.iter().position(|s| s.ole.filepath == path) {
            log::debug!("'{}' is already open", path.display());
            self.active_index = Some(index);
            return;
        }

        // Prevent loading more files than allowed by the app settings
        if self.sessions.len() >= self.settings.max_tabs {
            self.error
                .borrow_mut()
                .replace("Maximum number of tabs reached".into());
            return;
        }

        if !OleFile::is_ole_file(&path) {
            log::warn!("Rejected '{}': no compound file signature", path.display());
            self.error.borrow_mut().replace(format!(
                "'{}' is not an OLE2 structured storage file!",
                path.display()
            ));
            return;
        }

        let ole = match OleFile::open(&path) {
            Ok(ole) => ole,
            Err(err) => {
                log::error!("Failed to parse '{}': {err}", path.display());
                self.error
                    .borrow_mut()
                    .replace(format!("Failed to open file: '{}'!", path.display()));
                return;
            }
        };

        let new_session = OleSession {
            name: path.file_name().map_or_else(
                || "Untitled".to_string(),
                |n| n.to_string_lossy().into_owned(),
            ),
            tree: ole.tree(),
            ole,
            selected: None,
            view: HexView::new(self.glyph.unwrap_or_default()),
            scroll_id: egui::Id::new(("hexview", path)),
            events: self.events.clone(), // clone the pointer
            error: self.error.clone(),   // clone the pointer
        };

        // Add the new session and switch to it
        self.sessions.push(new_session);
        self.active_index = Some(self.sessions.len() - 1);
    }

    /// Close the file with the given ID. When the file is closed, switch to the first one.
    pub(crate) fn close_file(&mut self, session_id: usize) {
        if session_id >= self.sessions.len() {
            return;
        }
        let session = self.sessions.remove(session_id);
        log::info!("Closed '{}'", session.ole.filepath.display());

        if self.sessions.is_empty() {
            self.active_index = None;
        } else {
            self.active_index = Some(0);
        }
    }
}

impl OleSession {
    /// Read a stream and show it in the hex view. On failure the view is cleared.
    pub(crate) fn select_stream(&mut self, path: &[String]) {
        let parts: Vec<&str> = path.iter().map(String::as_str).collect();

        match self.ole.read_stream(&parts) {
            Ok(data) => {
                log::info!("Showing stream '{}' ({} bytes)", parts.join("/"), data.len());
                self.view.set_data(Some(data));
                self.selected = Some(path.to_vec());
            }
            Err(err) => {
                log::warn!("Failed to read stream '{}': {err}", parts.join("/"));
                self.view.set_data(None);
                self.selected = None;
                self.error.borrow_mut().replace(err.to_string());
            }
        }
    }
}
