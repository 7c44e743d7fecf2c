use crate::events::EventState;
use crate::hexlayout::{FONT_SIZE, GlyphMetrics, pick_monospace_family};
use crate::hexview::HexView;
use crate::ui_popup::Popup;
use eframe::egui;
use olelib::{EntryNode, OleFile};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

pub mod colors {
    use eframe::egui::Color32;

    pub const LIGHT_BLUE: Color32 = Color32::from_rgba_premultiplied(33, 81, 109, 90);
    pub const GRAY: Color32 = Color32::from_gray(128);
    pub const GRAY_160: Color32 = Color32::from_gray(160);
    pub const GRAY_210: Color32 = Color32::from_gray(210);
    pub const SHADOW: Color32 = Color32::from_black_alpha(150);
}

/// Hard-coded application defaults
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    /// Maximum number of files open at once
    pub max_tabs: usize,
    /// Initial window size
    pub window_size: [f32; 2],
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            max_tabs: 8,
            window_size: [880.0, 510.0],
        }
    }
}

pub struct OleSession {
    /// Name of the session (aka filename)
    pub name: String,
    /// Parsed compound file returned by `olelib`
    pub ole: OleFile,
    /// Storage hierarchy shown in the side panel
    pub tree: Option<EntryNode>,
    /// Path of the stream shown in the hex view
    pub selected: Option<Vec<String>>,
    /// Hex view of the selected stream
    pub view: HexView,
    /// Id of the hex view's scroll state
    pub scroll_id: egui::Id,

    // -- Shared UI states
    /// Per-frame state of user inputs
    pub events: Rc<RefCell<EventState>>,
    /// Errors while opening the file or reading streams
    pub error: Rc<RefCell<Option<String>>>,
}

pub struct OleEditorApp {
    /// Vector of opened sessions. Each session is represented by an `OleSession` struct.
    pub sessions: Vec<OleSession>,
    /// Index of the currently active session. If `None`, no session is active.
    pub active_index: Option<usize>,
    pub settings: AppSettings,
    /// Font of the hex view
    pub font: egui::FontId,
    /// Glyph size of `font`, measured on the first frame
    pub glyph: Option<GlyphMetrics>,
    /// Pop up handler
    pub popup: Popup,
    /// Files to open on the first frame
    pub pending_files: Vec<PathBuf>,

    // -- Shared UI states
    /// Per-frame state of user inputs
    pub events: Rc<RefCell<EventState>>,
    /// Errors while opening files or reading streams
    pub error: Rc<RefCell<Option<String>>>,
}

impl Default for OleEditorApp {
    fn default() -> Self {
        Self::new(&egui::FontDefinitions::default())
    }
}

impl OleEditorApp {
    /// Create the app for the fonts registered in `fonts`
    pub fn new(fonts: &egui::FontDefinitions) -> Self {
        let available: Vec<egui::FontFamily> = fonts.families.keys().cloned().collect();

        Self {
            sessions: Vec::new(),
            active_index: None,
            settings: AppSettings::default(),
            font: egui::FontId::new(FONT_SIZE, pick_monospace_family(&available)),
            glyph: None,
            popup: Popup::default(),
            pending_files: Vec::new(),
            events: Rc::new(RefCell::new(EventState::default())),
            error: Rc::new(RefCell::new(None)),
        }
    }

    /// Get the currently active session, if any
    pub(crate) fn get_curr_session(&self) -> Option<&OleSession> {
        self.active_index.and_then(|i| self.sessions.get(i))
    }

    /// Get a mutable reference to the currently active session, if any
    pub(crate) fn get_curr_session_mut(&mut self) -> Option<&mut OleSession> {
        self.active_index.and_then(|i| self.sessions.get_mut(i))
    }

    /// Measure the hex view font once fonts are available
    pub(crate) fn measure_glyph(&mut self, ctx: &egui::Context) {
        if self.glyph.is_some() {
            return;
        }

        // Average over a run of digits to avoid per-glyph rounding
        let sample = "0".repeat(16);
        let galley = ctx
            .layer_painter(egui::LayerId::background())
            .layout_no_wrap(sample, self.font.clone(), colors::GRAY);
        let size = galley.size();

        let glyph = GlyphMetrics {
            width: size.x / 16.0,
            height: size.y,
        };
        log::debug!("Hex view glyph {:.2} x {:.2} ({:?})", glyph.width, glyph.height, self.font);
        self.glyph = Some(glyph);
    }
}
