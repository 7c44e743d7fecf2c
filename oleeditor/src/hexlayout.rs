//! Geometry of the hex view: column space, pane positions and address formatting.
//!
//! Every byte occupies three columns in the hex pane (two digits and a separator)
//! and one glyph in the ASCII pane. ASCII position `c` maps to hex column `3c - 1`,
//! so both panes share a single column space and `(col + 1) / 3` is the byte index.

use crate::textcursor::Pane;
use eframe::egui::FontFamily;

pub const BYTES_PER_LINE: usize = 16;
/// Hex pane columns per line: digits and separators, no trailing separator
pub const CHARS_PER_LINE: usize = 3 * BYTES_PER_LINE - 1;
/// Upper bound of the printable range used for the ASCII pane and text copy.
/// Wider than ASCII on purpose: every byte from 0x20 up is shown as itself.
pub const PRINTABLE_MAX: u32 = 0x126;
pub const FONT_SIZE: f32 = 13.0;
/// Named monospace families in order of preference
pub const PREFERRED_FAMILIES: [&str; 3] = ["Monospace", "TypeWriter", "Courier"];

/// Fixed advance and line height of the monospace font
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    pub width: f32,
    pub height: f32,
}

impl Default for GlyphMetrics {
    /// Estimate used until the real font has been measured
    fn default() -> Self {
        Self {
            width: (FONT_SIZE * 0.6).round(),
            height: (FONT_SIZE * 1.3).round(),
        }
    }
}

/// Pick the first preferred named family that is installed, else egui's built-in monospace
pub fn pick_monospace_family(available: &[FontFamily]) -> FontFamily {
    PREFERRED_FAMILIES
        .iter()
        .find_map(|preferred| {
            available.iter().find(|family| {
                matches!(family, FontFamily::Name(name) if name.as_ref() == *preferred)
            })
        })
        .cloned()
        .unwrap_or(FontFamily::Monospace)
}

pub const fn line_count(byte_len: usize) -> usize {
    byte_len.div_ceil(BYTES_PER_LINE)
}

/// Number of hex digits of the largest line address, at least 4
pub fn address_digits(line_count: usize) -> usize {
    format!("{:X}", line_count * BYTES_PER_LINE).len().max(4)
}

pub fn format_address(addr: usize, digits: usize) -> String {
    format!("{addr:0digits$X}h")
}

/// Byte offset of a column-space position
pub const fn byte_offset(line: usize, col: usize) -> usize {
    line * BYTES_PER_LINE + (col + 1) / 3
}

pub const fn is_separator(col: usize) -> bool {
    col % 3 == 2
}

pub fn is_printable(byte: u8) -> bool {
    (0x20..=PRINTABLE_MAX).contains(&u32::from(byte))
}

pub fn display_char(byte: u8) -> char {
    if is_printable(byte) {
        char::from(byte)
    } else {
        '.'
    }
}

/// Pixel positions of the address column and both panes, in content coordinates
/// (before horizontal scrolling).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    pub glyph: GlyphMetrics,
    pub line_count: usize,
    pub address_digits: usize,
}

impl HexLayout {
    pub fn new(glyph: GlyphMetrics, byte_len: usize) -> Self {
        let line_count = line_count(byte_len);
        Self {
            glyph,
            line_count,
            address_digits: address_digits(line_count),
        }
    }

    /// Address column including the trailing `h`
    #[allow(clippy::cast_precision_loss)]
    pub fn address_width(&self) -> f32 {
        (self.address_digits + 1) as f32 * self.glyph.width
    }

    pub fn hex_x(&self) -> f32 {
        self.address_width()
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn ascii_x(&self) -> f32 {
        self.hex_x() + (CHARS_PER_LINE + 1) as f32 * self.glyph.width
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn content_width(&self) -> f32 {
        self.ascii_x() + BYTES_PER_LINE as f32 * self.glyph.width
    }

    pub fn pane_x(&self, pane: Pane) -> f32 {
        match pane {
            Pane::Hex => self.hex_x(),
            Pane::Ascii => self.ascii_x(),
        }
    }

    /// Left edge of column `col` (a boundary between glyphs) in the given pane
    #[allow(clippy::cast_precision_loss)]
    pub fn column_x(&self, pane: Pane, col: usize) -> f32 {
        match pane {
            Pane::Hex => self.hex_x() + col as f32 * self.glyph.width,
            Pane::Ascii => self.ascii_x() + ((col + 1) / 3) as f32 * self.glyph.width,
        }
    }

    /// Left edge of byte `index` (0..=16) within a line of the ASCII pane
    #[allow(clippy::cast_precision_loss)]
    pub fn ascii_byte_x(&self, index: usize) -> f32 {
        self.ascii_x() + index as f32 * self.glyph.width
    }
}
