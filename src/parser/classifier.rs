//! Line classifier
//!
//! Pure, allocation-free classification of count file lines.

use std::sync::OnceLock;

use regex::Regex;

use super::Line;

fn header_pattern() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"^\s*block\s*:\s*([0-9A-Za-z_]+)\s*$").unwrap())
}

fn entry_pattern() -> &'static Regex {
    static ENTRY: OnceLock<Regex> = OnceLock::new();
    ENTRY.get_or_init(|| Regex::new(r"^\s*([0-9A-Za-z_]+)\s*:\s*([0-9]+)\s*$").unwrap())
}

/// Classifies raw lines according to the count file grammar
#[derive(Debug, Clone, Copy)]
pub struct LineClassifier {
    comment_marker: char,
}

impl LineClassifier {
    /// Create a classifier using the given comment marker
    pub fn new(comment_marker: char) -> Self {
        Self { comment_marker }
    }

    /// Classify one line (without its trailing newline)
    ///
    /// Order of checks:
    /// 1. Strip the trailing comment
    /// 2. Blank remainder → `Ignorable`
    /// 3. Block header
    /// 4. Count entry
    /// 5. Otherwise → `Unrecognized`
    pub fn classify<'a>(&self, line: &'a str) -> Line<'a> {
        let body = strip_comment(line, self.comment_marker);

        if body.trim().is_empty() {
            return Line::Ignorable;
        }

        if let Some(caps) = header_pattern().captures(body) {
            if let Some(name) = caps.get(1) {
                return Line::BlockHeader { name: name.as_str() };
            }
        }

        if let Some(caps) = entry_pattern().captures(body) {
            if let (Some(device), Some(count)) = (caps.get(1), caps.get(2)) {
                return Line::Entry {
                    device: device.as_str(),
                    count: count.as_str(),
                };
            }
        }

        Line::Unrecognized
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new('#')
    }
}

/// Return the part of `line` before the first unescaped `marker`
///
/// A marker preceded by an unescaped `\` is kept as text; `\\` is an
/// escaped backslash, so the marker after it still starts a comment.
pub fn strip_comment(line: &str, marker: char) -> &str {
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if ch == marker && !escaped {
            return &line[..idx];
        }
        escaped = ch == '\\' && !escaped;
    }
    line
}
