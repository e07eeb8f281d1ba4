//! # Fonts and Print Mode
//!
//! Text styling on these printers is split across two mechanisms:
//!
//! - A single style bitmask applied with `ESC !` ([`PrintMode`])
//! - A font index applied with `ESC M` plus a size-magnification byte
//!   applied with `GS !`
//!
//! The driver keeps both in sync: the double-height/width bits of the
//! print mode are mirrored into the magnification byte whenever the font
//! or size changes.
//!
//! ## Font Metrics
//!
//! | Font | Size (dots) | Notes |
//! |------|-------------|-------|
//! | A | 12×24 | default, clean at all sizes |
//! | B | 9×24 | condensed A |
//! | C | 9×17 | smaller B |
//! | D | 8×16 | single-line tiny |
//! | E | 16×16 | wide with serifs |
//!
//! Fonts C-E are undocumented extras of the GY-EH402 S1.06 firmware with
//! usable glyphs only in the 0-127 range.

use bitflags::bitflags;

bitflags! {
    /// Style bitmask sent with `ESC !`.
    ///
    /// The inverse bit is ignored by firmware ≥ 2.68, which takes the
    /// direct `GS B` command instead; the driver picks the right one.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PrintMode: u8 {
        /// Select alternate font (legacy; superseded by `ESC M`)
        const FONT          = 1 << 0;
        /// White-on-black printing
        const INVERSE       = 1 << 1;
        /// Upside-down printing
        const UPSIDE_DOWN   = 1 << 2;
        /// Bold (double-strike)
        const BOLD          = 1 << 3;
        /// Double-height characters
        const DOUBLE_HEIGHT = 1 << 4;
        /// Double-width characters
        const DOUBLE_WIDTH  = 1 << 5;
        /// Strikethrough
        const STRIKE        = 1 << 6;
    }
}

impl PrintMode {
    /// Pack the doubled-size bits into the layout stored alongside the
    /// font index: bit 7 = double width, bit 3 = double height.
    #[inline]
    pub fn style_bits(self) -> u8 {
        ((self.bits() & Self::DOUBLE_WIDTH.bits()) << 2)
            | ((self.bits() & Self::DOUBLE_HEIGHT.bits()) >> 1)
    }

    /// The `GS !` magnification byte: high nibble width, low nibble height.
    #[inline]
    pub fn size_byte(self) -> u8 {
        self.style_bits() >> 3
    }
}

/// Character font, selected with `ESC M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Font {
    /// 12×24 dots
    #[default]
    A = 0,
    /// 9×24 dots
    B = 1,
    /// 9×17 dots
    C = 2,
    /// 8×16 dots
    D = 3,
    /// 16×16 dots
    E = 4,
}

impl Font {
    /// Base character cell in dots, `(width, height)`, before any
    /// double-size magnification.
    pub fn metrics(self) -> (u8, u8) {
        match self {
            Font::A => (12, 24),
            Font::B => (9, 24),
            Font::C => (9, 17),
            Font::D => (8, 16),
            Font::E => (16, 16),
        }
    }

    /// Font for a raw index byte. Out-of-range values select font A,
    /// matching the firmware's treatment of unknown indices.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Font::B,
            2 => Font::C,
            3 => Font::D,
            4 => Font::E,
            _ => Font::A,
        }
    }

    /// Font for a letter `'A'..='E'` (case-insensitive); anything else
    /// selects font A.
    pub fn from_letter(letter: char) -> Self {
        match letter.to_ascii_uppercase() {
            'B' => Font::B,
            'C' => Font::C,
            'D' => Font::D,
            'E' => Font::E,
            _ => Font::A,
        }
    }
}

/// Text alignment, applied with `ESC a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// Convenience text sizes built from the double-height/width bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSize {
    /// Standard width and height
    #[default]
    Small,
    /// Double height
    Medium,
    /// Double width and height
    Large,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_table() {
        assert_eq!(Font::A.metrics(), (12, 24));
        assert_eq!(Font::B.metrics(), (9, 24));
        assert_eq!(Font::C.metrics(), (9, 17));
        assert_eq!(Font::D.metrics(), (8, 16));
        assert_eq!(Font::E.metrics(), (16, 16));
    }

    #[test]
    fn test_from_index_clamps() {
        assert_eq!(Font::from_index(1), Font::B);
        assert_eq!(Font::from_index(5), Font::A);
        assert_eq!(Font::from_index(255), Font::A);
    }

    #[test]
    fn test_from_letter() {
        assert_eq!(Font::from_letter('b'), Font::B);
        assert_eq!(Font::from_letter('E'), Font::E);
        assert_eq!(Font::from_letter('x'), Font::A);
    }

    #[test]
    fn test_style_bits_mirror_size_flags() {
        let both = PrintMode::DOUBLE_WIDTH | PrintMode::DOUBLE_HEIGHT;
        assert_eq!(both.style_bits(), 0b1000_1000);
        assert_eq!(both.size_byte(), 0x11);

        assert_eq!(PrintMode::DOUBLE_WIDTH.size_byte(), 0x10);
        assert_eq!(PrintMode::DOUBLE_HEIGHT.size_byte(), 0x01);
        assert_eq!(PrintMode::BOLD.size_byte(), 0x00);
    }
}
