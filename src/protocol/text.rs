//! # ESC/POS Text Styling Commands
//!
//! | Style | Command | Effect |
//! |-------|---------|--------|
//! | Alignment | ESC a n | Left / center / right |
//! | Font | ESC M n | Font A or B |
//! | Bold | ESC E n | **Emphasized** text |
//!
//! ## Font Selection
//!
//! | Font | Size | Columns (80mm, 576 dots) |
//! |------|------|--------------------------|
//! | Font A | 12×24 dots | 48 chars |
//! | Font B | 9×17 dots | 64 chars |

use serde::{Deserialize, Serialize};

use super::commands::ESC;

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// # Set Justification (ESC a n)
///
/// Takes effect at the start of the next line; also positions raster
/// images.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC a n |
/// | Hex     | 1B 61 n |
///
/// ```
/// use pingslip::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// FONT SELECTION
// ============================================================================

/// Available fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Font {
    /// Font A: 12×24 dots, the larger body font
    #[default]
    A = 0,
    /// Font B: 9×17 dots, used for headers and captions
    B = 1,
}

/// # Select Character Font (ESC M n)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC M n |
/// | Hex     | 1B 4D n |
///
/// ```
/// use pingslip::protocol::text::{font, Font};
///
/// assert_eq!(font(Font::B), vec![0x1B, 0x4D, 0x01]);
/// ```
pub fn font(f: Font) -> Vec<u8> {
    vec![ESC, b'M', f as u8]
}

// ============================================================================
// EMPHASIS
// ============================================================================

/// # Emphasized Mode (ESC E n)
///
/// `n = 1` turns bold on, `n = 0` turns it off.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC E n |
/// | Hex     | 1B 45 n |
pub fn bold(enabled: bool) -> Vec<u8> {
    vec![ESC, b'E', enabled as u8]
}

// ============================================================================
// COMBINED STYLE
// ============================================================================

/// The full text style a receipt line is printed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextStyle {
    pub align: Alignment,
    pub font: Font,
    pub bold: bool,
}

impl TextStyle {
    pub fn new(align: Alignment, font: Font, bold: bool) -> Self {
        Self { align, font, bold }
    }

    /// Commands that establish this style from any previous state.
    ///
    /// ```
    /// use pingslip::protocol::text::{Alignment, Font, TextStyle};
    ///
    /// let cmds = TextStyle::new(Alignment::Left, Font::B, true).to_commands();
    /// assert_eq!(cmds, vec![0x1B, 0x61, 0, 0x1B, 0x4D, 1, 0x1B, 0x45, 1]);
    /// ```
    pub fn to_commands(&self) -> Vec<u8> {
        let mut cmds = align(self.align);
        cmds.extend(font(self.font));
        cmds.extend(bold(self.bold));
        cmds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align() {
        assert_eq!(align(Alignment::Left), vec![0x1B, 0x61, 0x00]);
        assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
        assert_eq!(align(Alignment::Right), vec![0x1B, 0x61, 0x02]);
    }

    #[test]
    fn test_font() {
        assert_eq!(font(Font::A), vec![0x1B, 0x4D, 0x00]);
        assert_eq!(font(Font::B), vec![0x1B, 0x4D, 0x01]);
    }

    #[test]
    fn test_bold() {
        assert_eq!(bold(true), vec![0x1B, 0x45, 0x01]);
        assert_eq!(bold(false), vec![0x1B, 0x45, 0x00]);
    }

    #[test]
    fn test_default_style() {
        let style = TextStyle::default();
        assert_eq!(style.align, Alignment::Left);
        assert_eq!(style.font, Font::A);
        assert!(!style.bold);
        assert_eq!(
            style.to_commands(),
            vec![0x1B, 0x61, 0, 0x1B, 0x4D, 0, 0x1B, 0x45, 0]
        );
    }
}
