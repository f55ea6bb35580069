//! # ESC/POS Printer Commands
//!
//! Basic control commands for ESC/POS network receipt printers (Epson
//! TM series and the many compatibles that listen on TCP 9100).
//!
//! ## Escape Sequence Structure
//!
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - With parameters: `ESC d n`, `GS V m`, `GS v 0 m xL xH yL yH data...`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for graphics, cutter and character size commands.
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets text modes (bold, font, alignment)
/// to power-on defaults. Sent at the start of every job so a job never
/// inherits styling from a torn-down predecessor.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ```
/// use pingslip::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// PAPER FEED
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
///
/// Prints the line buffer, then advances `n` lines.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC d n  |
/// | Hex     | 1B 64 n  |
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

// ============================================================================
// CUTTER
// ============================================================================

/// Lines fed before cutting so the last printed line clears the blade.
pub const CUT_FEED_LINES: u8 = 6;

/// # Full Cut (GS V 0)
///
/// Cuts at the current position without feeding.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 0   |
/// | Hex     | 1D 56 00 |
#[inline]
pub fn cut_full() -> Vec<u8> {
    vec![GS, b'V', 0]
}

/// # Partial Cut (GS V 1)
///
/// Leaves a small hinge holding the receipt to the roll.
#[inline]
pub fn cut_partial() -> Vec<u8> {
    vec![GS, b'V', 1]
}

/// Feed past the cutter, then full cut.
///
/// ```
/// use pingslip::protocol::commands;
///
/// assert_eq!(
///     commands::cut_full_feed(),
///     vec![0x1B, 0x64, 6, 0x1D, 0x56, 0x00],
/// );
/// ```
pub fn cut_full_feed() -> Vec<u8> {
    let mut cmd = feed_lines(CUT_FEED_LINES);
    cmd.extend(cut_full());
    cmd
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use pingslip::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(384), [0x80, 0x01]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_feed_lines() {
        assert_eq!(feed_lines(0), vec![0x1B, 0x64, 0x00]);
        assert_eq!(feed_lines(6), vec![0x1B, 0x64, 0x06]);
    }

    #[test]
    fn test_cut_full() {
        assert_eq!(cut_full(), vec![0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_cut_partial() {
        assert_eq!(cut_partial(), vec![0x1D, 0x56, 0x01]);
    }

    #[test]
    fn test_cut_full_feed() {
        assert_eq!(cut_full_feed(), vec![0x1B, 0x64, 6, 0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0x0000), [0x00, 0x00]);
        assert_eq!(u16_le(0x00FF), [0xFF, 0x00]);
        assert_eq!(u16_le(0xFF00), [0x00, 0xFF]);
        assert_eq!(u16_le(576), [0x40, 0x02]);
    }
}
