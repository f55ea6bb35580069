//! # Text Layout
//!
//! Greedy word wrap for fixed-pitch receipt fonts.
//!
//! Each word is followed by one space, and a line is flushed *before* a word
//! that would bring it to `width` or more characters. Words are never split:
//! a word longer than `width` ends up alone on an overlong line.
//!
//! ```
//! use pingslip::layout::wrap;
//!
//! assert_eq!(
//!     wrap("hello there friend", 10),
//!     vec!["hello ", "there ", "friend "],
//! );
//! ```

/// Wrap `text` to lines of at most `width` characters (see module docs).
///
/// Lengths are counted in `char`s. Empty or all-whitespace input yields no
/// lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len > 0 && line_len + word_len >= width {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
        line.push_str(word);
        line.push(' ');
        line_len += word_len + 1;
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}
