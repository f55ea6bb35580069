//! # Code Page 437 Encoding
//!
//! Converts chat text to the single-byte character set ESC/POS printers
//! select at power-on (PC437, `ESC t 0`).
//!
//! Chat messages are untrusted input going straight into a command stream,
//! so control characters are never passed through: an `ESC` or `GS` in a
//! message body would otherwise be executed by the printer. Only `LF` and
//! printable characters survive.

use tracing::debug;

/// Unicode code points for CP437 bytes 0x80–0xFF, in byte order.
const CP437_HIGH: [char; 128] = [
    // 0x80
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    // 0x90
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    // 0xA0
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    // 0xB0
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    // 0xC0
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    // 0xD0
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    // 0xE0
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    // 0xF0
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{00A0}',
];

/// Map a Unicode character to its CP437 byte, if it has one.
fn unicode_to_cp437(ch: char) -> Option<u8> {
    CP437_HIGH
        .iter()
        .position(|&c| c == ch)
        .map(|i| 0x80 + i as u8)
}

/// Encode text as CP437 bytes safe to embed in a command stream.
///
/// - Printable ASCII and `\n`: passed through
/// - Tabs and other whitespace controls: a single space
/// - Other control characters (including `ESC`, `GS`, `DEL`): dropped
/// - CP437 upper half: its byte value
/// - Anything else: `?`
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\n' => out.push(b'\n'),
            '\t' | '\r' | '\u{0B}' | '\u{0C}' => out.push(b' '),
            ' '..='~' => out.push(ch as u8),
            c if c.is_control() => {}
            c => match unicode_to_cp437(c) {
                Some(byte) => out.push(byte),
                None => {
                    debug!("cp437: unmapped character U+{:04X}, printing '?'", c as u32);
                    out.push(b'?');
                }
            },
        }
    }
    out
}
