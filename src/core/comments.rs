//! Turns the raw comment lines in front of an entry into a translator note.
//!
//! The parser already decides adjacency: only comment lines directly above an
//! entry, with no blank or other line in between, are attached to it. This
//! module formats them and applies the optional per-file comment prefix.
//!
//! ```yaml
//! # L10N: shown to the user
//! # on the checkout page
//! title: Checkout
//! ```
//!
//! With prefix `L10N:` the note for `title` is `"shown to the user\n on the checkout page"`.

use crate::core::document::LeadingComment;

/// Joins consecutive comment lines in a note.
pub const LINE_SEPARATOR: &str = "\n ";

/// Formats leading comments, optionally keeping only prefixed ones.
#[derive(Debug, Clone, Default)]
pub struct CommentTracker {
    prefix: Option<String>,
}

impl CommentTracker {
    pub fn new(prefix: Option<&str>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Produce the note for an entry.
    ///
    /// - `None` when the entry had no comment lines, or when a prefix is
    ///   configured and the comment does not start with it.
    /// - `Some("")` when a comment line was present but blank.
    pub fn resolve(&self, comment: Option<&LeadingComment>) -> Option<String> {
        let comment = comment?;
        if comment.lines.is_empty() {
            return None;
        }
        let text = comment
            .lines
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join(LINE_SEPARATOR);

        match &self.prefix {
            Some(prefix) => text
                .strip_prefix(prefix.as_str())
                .map(|rest| rest.trim().to_string()),
            None => Some(text),
        }
    }
}
