//! The hex view: an immutable byte buffer shown as address, hex and ASCII columns,
//! with a text cursor, drag selection, caret blink and clipboard copy.
//!
//! Positions handed to the view are in viewport coordinates (origin at the top-left
//! corner of the drawing area). The view applies its own scroll offsets.

use crate::blink::CursorBlink;
use crate::hexlayout::{
    BYTES_PER_LINE, CHARS_PER_LINE, GlyphMetrics, HexLayout, byte_offset, display_char,
    is_separator,
};
use crate::textcursor::{CursorPos, Pane, TextCursor};
use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};
use std::ops::Range;

pub const CARET_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    SelectionChanged,
}

/// Destination of copied text
pub trait Clipboard {
    fn set_text(&mut self, text: String);
}

/// Result of mapping a pointer position to the text grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub col: usize,
    pub pane: Pane,
}

/// Highlighted regions of one line of the selection, in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionSpans {
    pub hex: Rect,
    pub ascii: Rect,
}

#[derive(Debug)]
pub struct HexView {
    /// Stream contents. Never empty when present.
    data: Option<Vec<u8>>,
    cursor: TextCursor,
    /// Caret position of the last press. Drags extend from here, never from
    /// the snapped anchor.
    press: Option<CursorPos>,
    layout: HexLayout,
    /// Size of the drawing area in pixels
    viewport: Vec2,
    /// Horizontal scroll offset in pixels
    h_scroll: f32,
    /// Vertical scroll offset in lines
    first_line: usize,
    blink: CursorBlink,
    focused: bool,
    /// Last time seen by `on_tick`
    now: f64,
}

impl HexView {
    pub fn new(glyph: GlyphMetrics) -> Self {
        Self {
            data: None,
            cursor: TextCursor::default(),
            press: None,
            layout: HexLayout::new(glyph, 0),
            viewport: Vec2::ZERO,
            h_scroll: 0.0,
            first_line: 0,
            blink: CursorBlink::default(),
            focused: false,
            now: 0.0,
        }
    }

    /// Replace the buffer. Resets the cursor, the scroll offsets and the caret blink.
    /// An empty buffer is treated like no buffer.
    pub fn set_data(&mut self, data: Option<Vec<u8>>) {
        self.data = data.filter(|d| !d.is_empty());
        let len = self.data.as_ref().map_or(0, Vec::len);
        self.layout = HexLayout::new(self.layout.glyph, len);

        self.h_scroll = 0.0;
        self.first_line = 0;
        if self.data.is_some() {
            self.cursor.move_to(0, 0);
        } else {
            self.cursor.clear();
        }
        self.press = self.cursor.anchor();

        if self.focused {
            self.blink.start(self.now);
        } else {
            self.blink.stop();
        }

        log::debug!(
            "Hex view loaded {len} bytes ({} lines)",
            self.layout.line_count
        );
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }

    pub const fn line_count(&self) -> usize {
        self.layout.line_count
    }

    pub const fn layout(&self) -> &HexLayout {
        &self.layout
    }

    pub const fn cursor(&self) -> &TextCursor {
        &self.cursor
    }

    pub fn has_selection(&self) -> bool {
        self.cursor.has_selection()
    }

    /// Selected byte range, `None` without a non-empty selection
    pub fn selection_range(&self) -> Option<Range<usize>> {
        if !self.cursor.has_selection() {
            return None;
        }
        let len = self.data().len();
        let begin = self.cursor.begin()?;
        let end = self.cursor.end()?;

        let from = byte_offset(begin.line, begin.col).min(len);
        let to = byte_offset(end.line, end.col).min(len);
        (from < to).then_some(from..to)
    }

    //  ========================== Viewport ============================= //

    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.viewport = size;
        // Re-apply the offsets against the new ranges
        self.set_h_scroll(self.h_scroll);
        self.set_v_scroll(self.first_line);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn lines_per_page(&self) -> usize {
        if self.layout.glyph.height <= 0.0 {
            return 0;
        }
        (self.viewport.y / self.layout.glyph.height).floor().max(0.0) as usize
    }

    pub fn v_scroll_max(&self) -> usize {
        self.line_count().saturating_sub(self.lines_per_page())
    }

    pub fn h_scroll_max(&self) -> f32 {
        if self.data.is_none() {
            return 0.0;
        }
        (self.layout.content_width() - self.viewport.x).max(0.0)
    }

    pub fn set_h_scroll(&mut self, offset: f32) {
        self.h_scroll = offset.clamp(0.0, self.h_scroll_max());
    }

    pub fn set_v_scroll(&mut self, first_line: usize) {
        self.first_line = first_line.min(self.v_scroll_max());
    }

    pub fn scroll_by_lines(&mut self, delta: isize) {
        self.set_v_scroll(self.first_line.saturating_add_signed(delta));
    }

    pub const fn h_scroll(&self) -> f32 {
        self.h_scroll
    }

    pub const fn first_visible_line(&self) -> usize {
        self.first_line
    }

    /// Lines that intersect the viewport, including a partially visible last one
    pub fn visible_lines(&self) -> Range<usize> {
        let end = (self.first_line + self.lines_per_page() + 1).min(self.line_count());
        self.first_line.min(end)..end
    }

    //  ========================== Coordinate mapping ============================= //

    /// Map a viewport position to a line, a column and the pane under it
    pub fn locate(&self, pos: Pos2) -> Option<Location> {
        let x = pos.x + self.h_scroll;
        let pane = if x >= self.layout.ascii_x() {
            Pane::Ascii
        } else {
            Pane::Hex
        };
        self.locate_in(pos, pane)
    }

    /// Map a viewport position to a line and a column of the given pane
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    pub fn locate_in(&self, pos: Pos2, pane: Pane) -> Option<Location> {
        let last_line = self.line_count().checked_sub(1)?;
        let glyph = self.layout.glyph;

        let row = (pos.y / glyph.height).floor() as i64;
        let line = (row + self.first_line as i64).clamp(0, last_line as i64) as usize;

        // Round to the nearer glyph boundary
        let x = pos.x + self.h_scroll;
        let mut col =
            ((x - self.layout.pane_x(pane) + glyph.width / 2.0) / glyph.width).floor() as i64;
        if pane == Pane::Ascii {
            col = 3 * col - 1;
        }

        // Never past the last byte of a partial line
        let remainder = self.data().len() % BYTES_PER_LINE;
        if line == last_line && remainder != 0 {
            col = col.min(3 * remainder as i64);
        }

        let col = col.clamp(0, CHARS_PER_LINE as i64) as usize;
        Some(Location { line, col, pane })
    }

    //  ========================== Input transitions ============================= //

    /// Pointer pressed: place the caret on a whole byte and focus the view
    pub fn on_press(&mut self, pos: Pos2) -> Vec<Notification> {
        let Some(mut loc) = self.locate(pos) else {
            return Vec::new();
        };
        if loc.pane == Pane::Hex && is_separator(loc.col) {
            loc.col -= 2;
        }

        self.cursor.move_to(loc.line, loc.col);
        self.cursor.set_active_pane(loc.pane);
        self.press = Some(CursorPos::new(loc.line, loc.col));
        self.focused = true;
        self.blink.start(self.now);

        log::trace!("Caret at line {} column {} ({:?})", loc.line, loc.col, loc.pane);
        vec![Notification::SelectionChanged]
    }

    /// Pointer moved with the button held: extend the selection in the pane the press started in
    pub fn on_drag(&mut self, pos: Pos2) -> Vec<Notification> {
        let Some(press) = self.press else {
            return Vec::new();
        };
        let pane = self.cursor.active_pane();
        let Some(loc) = self.locate_in(pos, pane) else {
            return Vec::new();
        };

        // Snapping rewrites both ends, so every step starts over from the press
        self.cursor.move_to(press.line, press.col);
        self.cursor.select_to(loc.line, loc.col);
        if pane == Pane::Hex && self.cursor.has_selection() {
            self.snap_to_bytes();
        }

        vec![Notification::SelectionChanged]
    }

    /// Snap both ends of a hex selection to byte boundaries. The end column is
    /// exclusive: `3i + 2` closes byte `i`, `3i` would take in the separator before byte `i`.
    fn snap_to_bytes(&mut self) {
        let (Some(begin), Some(end)) = (self.cursor.begin_pos(), self.cursor.end_pos()) else {
            return;
        };

        // Grow over half-selected digit pairs, shrink off separators
        let mut begin = match begin % 3 {
            1 => begin - 1,
            2 => begin + 1,
            _ => begin,
        }
        .min(CHARS_PER_LINE);
        let mut end = match end % 3 {
            1 => end + 1,
            0 if end > 0 => end - 1,
            _ => end,
        }
        .min(CHARS_PER_LINE);

        if self.cursor.has_multi_lines() {
            // Select at least one byte on the outer lines
            if end == 0 {
                end = 2;
            }
            if begin == CHARS_PER_LINE {
                begin = CHARS_PER_LINE - 2;
            }
        } else if begin >= end {
            // Only a separator was covered: collapse back to the anchor
            if let Some(anchor) = self.cursor.anchor() {
                self.cursor.move_to(anchor.line, anchor.col);
            }
            return;
        }

        self.cursor.set_begin_pos(begin);
        self.cursor.set_end_pos(end);
    }

    /// Advance the frame clock. Returns `true` if the caret visibility changed.
    pub fn on_tick(&mut self, now: f64) -> bool {
        self.now = now;
        if !self.focused || self.cursor.has_selection() {
            return false;
        }
        self.blink.on_tick(now)
    }

    /// Seconds until the caret next needs repainting, `None` if it does not blink
    pub fn next_blink_in(&self) -> Option<f64> {
        if self.data.is_none() || !self.focused || self.cursor.has_selection() {
            return None;
        }
        self.blink.next_toggle_in(self.now)
    }

    pub const fn on_focus_in(&mut self) {
        self.focused = true;
        self.blink.start(self.now);
    }

    pub const fn on_focus_out(&mut self) {
        self.focused = false;
        self.blink.stop();
    }

    pub const fn has_focus(&self) -> bool {
        self.focused
    }

    //  ========================== Copy ============================= //

    /// Copy the selection as uppercase hex pairs separated by spaces
    pub fn copy_as_hex(&self, clipboard: &mut impl Clipboard) -> Option<String> {
        let range = self.selection_range()?;
        let text = self.data()[range]
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");

        clipboard.set_text(text.clone());
        Some(text)
    }

    /// Copy the selection as characters, `.` for non-printable bytes
    pub fn copy_as_text(&self, clipboard: &mut impl Clipboard) -> Option<String> {
        let range = self.selection_range()?;
        let text: String = self.data()[range].iter().copied().map(display_char).collect();

        clipboard.set_text(text.clone());
        Some(text)
    }

    /// Copy in the form of the pane that last received input
    pub fn copy(&self, clipboard: &mut impl Clipboard) -> Option<String> {
        match self.cursor.active_pane() {
            Pane::Hex => self.copy_as_hex(clipboard),
            Pane::Ascii => self.copy_as_text(clipboard),
        }
    }

    //  ========================== Rendering geometry ============================= //

    /// Top of `line` in viewport coordinates, `None` if scrolled out above
    #[allow(clippy::cast_precision_loss)]
    pub fn line_top(&self, line: usize) -> Option<f32> {
        let row = line.checked_sub(self.first_line)?;
        Some(row as f32 * self.layout.glyph.height)
    }

    pub fn selection_spans(&self, line: usize) -> Option<SelectionSpans> {
        if !self.cursor.within(line) {
            return None;
        }
        let begin = self.cursor.begin()?;
        let end = self.cursor.end()?;
        let top = self.line_top(line)?;
        let bottom = top + self.layout.glyph.height;

        let start_col = if line == begin.line { begin.col } else { 0 };
        let end_col = if line == end.line {
            end.col
        } else {
            CHARS_PER_LINE
        };

        // An ASCII-pane begin sits on the separator before its byte
        let hex_start_col = 3 * ((start_col + 1) / 3);
        let hex = Rect::from_min_max(
            pos2(self.layout.column_x(Pane::Hex, hex_start_col) - self.h_scroll, top),
            pos2(self.layout.column_x(Pane::Hex, end_col) - self.h_scroll, bottom),
        );
        let ascii = Rect::from_min_max(
            pos2(
                self.layout.ascii_byte_x((start_col + 1) / 3) - self.h_scroll,
                top,
            ),
            pos2(
                self.layout.ascii_byte_x((end_col + 1) / 3) - self.h_scroll,
                bottom,
            ),
        );

        Some(SelectionSpans { hex, ascii })
    }

    /// Caret in the active pane, while it is shown and nothing is selected
    pub fn cursor_rect(&self) -> Option<Rect> {
        if self.data.is_none() || self.cursor.has_selection() || !self.blink.is_visible() {
            return None;
        }
        let pos = self.cursor.begin()?;
        let top = self.line_top(pos.line)?;
        let x = self.layout.column_x(self.cursor.active_pane(), pos.col) - self.h_scroll;

        Some(Rect::from_min_size(
            pos2(x, top),
            vec2(CARET_WIDTH, self.layout.glyph.height),
        ))
    }

    /// Region around the boundary of `(line, col)` that locates back to it
    #[cfg(test)]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rect(&self, line: usize, col: usize, pane: Pane) -> Rect {
        let glyph = self.layout.glyph;
        let top = (line as f32 - self.first_line as f32) * glyph.height;
        let center = self.layout.column_x(pane, col) - self.h_scroll;

        Rect::from_min_max(
            pos2(center - glyph.width / 2.0, top),
            pos2(center + glyph.width / 2.0, top + glyph.height),
        )
    }
}
