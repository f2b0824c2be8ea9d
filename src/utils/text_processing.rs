//! Text processing utilities.
//!
//! Task files are untrusted input that ends up on the terminal, so every
//! string is sanitized before it reaches a view. This module also holds the
//! small width helpers shared by the views (truncation and word wrap).

use log::*;
use regex::Regex;
use std::sync::OnceLock;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const ELLIPSIS: &str = "...";
pub const DEFAULT_MAX_LENGTH: usize = 1000;
const MAX_LINES: usize = 50;
const MAX_LINE_LENGTH: usize = 100;

/// CSI, OSC and charset selection sequences.
const ESCAPE_PATTERN: &str = r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[()][AB012]";

fn escape_regex() -> Option<&'static Regex> {
    static ESCAPES: OnceLock<Option<Regex>> = OnceLock::new();
    ESCAPES
        .get_or_init(|| match Regex::new(ESCAPE_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("Failed to compile escape pattern: {}", e);
                None
            }
        })
        .as_ref()
}

/// Make untrusted text safe to print on a terminal.
///
/// Escape sequences are removed, control characters other than `\n`, `\t`
/// and `\r` are dropped, and remaining format/separator characters are
/// replaced with `?`. The result is limited to `max_length` characters and
/// to 50 lines of at most 100 characters each.
///
pub fn sanitize_text(text: &str, max_length: usize) -> String {
    let stripped = match escape_regex() {
        Some(re) => re.replace_all(text, ""),
        None => text.into(),
    };

    let cleaned: String = stripped
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .map(|c| if is_unsafe_char(c) { '?' } else { c })
        .collect();

    let limited = truncate_with_ellipsis(&cleaned, max_length);
    limited
        .split('\n')
        .take(MAX_LINES)
        .map(|line| truncate_with_ellipsis(line, MAX_LINE_LENGTH))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format characters, separators other than plain whitespace, and private
/// use code points.
///
fn is_unsafe_char(c: char) -> bool {
    if matches!(c, ' ' | '\n' | '\t' | '\r') {
        return false;
    }
    if c.is_whitespace() {
        return true;
    }
    matches!(c as u32,
        0x00AD
        | 0x061C
        | 0x180E
        | 0x200B..=0x200F
        | 0x202A..=0x202E
        | 0x2060..=0x206F
        | 0xFEFF
        | 0xFFF9..=0xFFFB
        | 0xE000..=0xF8FF
        | 0xF0000..=0x10FFFF)
}

/// Return the width of a string in terminal cells.
///
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Return the longest prefix of `text` that fits in `width` cells.
///
pub fn clip_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += UnicodeWidthChar::width(*c).unwrap_or(0);
            used <= width
        })
        .collect()
}

/// Cut `text` to `max` cells, replacing the tail with `...` when it does not
/// fit. A budget smaller than the ellipsis yields a plain cut.
///
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if display_width(text) <= max {
        return text.to_string();
    }
    if max < ELLIPSIS.len() {
        return clip_to_width(text, max);
    }
    let mut cut = clip_to_width(text, max - ELLIPSIS.len());
    cut.push_str(ELLIPSIS);
    cut
}

/// Break text into lines no wider than `width` cells. Paragraph breaks are
/// preserved; words longer than the width are split.
///
pub fn word_wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = vec![];
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;
        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            while display_width(&word) > width {
                if line_width > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                let mut head = clip_to_width(&word, width);
                if head.is_empty() {
                    // A single glyph wider than the line still takes a line.
                    head = word.chars().take(1).collect();
                }
                word = word.split_off(head.len());
                lines.push(head);
            }
            if word.is_empty() {
                continue;
            }
            let word_width = display_width(&word);
            let needed = if line_width == 0 { word_width } else { line_width + 1 + word_width };
            if needed > width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(&word);
            line_width += word_width;
        }
        lines.push(line);
    }
    lines
}
