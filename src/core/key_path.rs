//! Resource key derivation.
//!
//! A leaf's key is the dotted path of mapping keys and sequence indices leading
//! to it. Literal dots inside a mapping key are escaped as `\.` so that
//! `"foo.bar"` and `foo` → `bar` stay distinguishable. Files with a path get
//! an extra leading segment, `r<hash>`, derived from the relative path so
//! that keys of different files never collide.

use std::fmt;

use crate::utils::{hash_key, normalize_path};

/// One step in a key path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A mapping key, unescaped.
    Key(String),
    /// A zero-based sequence index.
    Index(usize),
}

impl Segment {
    /// The segment as it appears in a dotted key, with dots escaped.
    pub fn escaped(&self) -> String {
        match self {
            Segment::Key(key) => escape_segment(key),
            Segment::Index(index) => index.to_string(),
        }
    }

    /// The raw text of the segment.
    pub fn as_text(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }
}

/// A path from the document root to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment, used for excluded-key matching.
    pub fn reskey(&self) -> Option<String> {
        self.segments.last().map(Segment::as_text)
    }

    /// Join the path into a dotted key, optionally behind a prefix segment.
    ///
    /// Returns `None` for the document root when there is no prefix.
    pub fn to_key(&self, prefix: Option<&str>) -> Option<String> {
        let mut parts: Vec<String> = Vec::with_capacity(self.segments.len() + 1);
        if let Some(prefix) = prefix {
            parts.push(prefix.to_string());
        }
        parts.extend(self.segments.iter().map(Segment::escaped));
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("."))
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(Segment::escaped).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Escape the dots in a raw mapping key.
pub fn escape_segment(key: &str) -> String {
    key.replace('.', "\\.")
}

/// Split a dotted key into its raw segments, honoring `\.` escapes.
///
/// A backslash not followed by a dot is kept as-is.
pub fn split_key(key: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = key.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'.') => {
                current.push('.');
                chars.next();
            }
            '.' => segments.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    segments.push(current);
    segments
}

/// The `r<hash>` prefix segment for a file path.
///
/// The hash covers the project-relative path as written, with `.` segments
/// removed. The extension and any locale or flavor marker in the file name
/// stay part of it, so `customization/en-ZA.yml` and
/// `customization/en-CHOCOLATE.yml` get different prefixes.
pub fn path_prefix(path: &str) -> String {
    hash_key(&normalize_path(path))
}

#[cfg(test)]
mod tests {
    use crate::core::key_path::*;

    fn path_of(segments: &[Segment]) -> KeyPath {
        let mut path = KeyPath::new();
        for segment in segments {
            path.push(segment.clone());
        }
        path
    }

    #[test]
    fn test_to_key_joins_segments() {
        let path = path_of(&[
            Segment::Key("Jobs".to_string()),
            Segment::Index(0),
            Segment::Key("name".to_string()),
        ]);
        assert_eq!(path.to_key(None).as_deref(), Some("Jobs.0.name"));
        assert_eq!(path.to_key(Some("r97")).as_deref(), Some("r97.Jobs.0.name"));
        assert_eq!(path.reskey().as_deref(), Some("name"));
    }

    #[test]
    fn test_literal_dot_is_escaped() {
        let dotted = path_of(&[Segment::Key("foo.bar".to_string())]);
        let nested = path_of(&[
            Segment::Key("foo".to_string()),
            Segment::Key("bar".to_string()),
        ]);
        assert_eq!(dotted.to_key(None).as_deref(), Some("foo\\.bar"));
        assert_eq!(nested.to_key(None).as_deref(), Some("foo.bar"));
        assert_ne!(dotted.to_key(None), nested.to_key(None));
    }

    #[test]
    fn test_root_without_prefix_has_no_key() {
        assert_eq!(KeyPath::new().to_key(None), None);
        assert_eq!(KeyPath::new().to_key(Some("r5")).as_deref(), Some("r5"));
    }

    #[test]
    fn test_split_key_unescapes() {
        assert_eq!(split_key("a.b.c"), vec!["a", "b", "c"]);
        assert_eq!(
            split_key("foo/bar/x\\.en-US\\.html\\.haml.r9834724545"),
            vec!["foo/bar/x.en-US.html.haml", "r9834724545"]
        );
        assert_eq!(split_key("back\\slash"), vec!["back\\slash"]);
        assert_eq!(split_key("single"), vec!["single"]);
    }

    #[test]
    fn test_split_key_inverts_escaping() {
        let raw = ["with.dot", "plain", "0", "ends."];
        let key = raw
            .iter()
            .map(|s| escape_segment(s))
            .collect::<Vec<_>>()
            .join(".");
        assert_eq!(split_key(&key), raw);
    }

    #[test]
    fn test_path_prefix_hashes_the_relative_path() {
        assert_eq!(path_prefix("x/y/z/foo.yaml"), "r70221679");
        assert_eq!(path_prefix("./test.yml"), "r343014569");
        assert_eq!(path_prefix("./test.yml"), path_prefix("test.yml"));
        assert_ne!(path_prefix("a/foo.yml"), path_prefix("b/foo.yml"));
    }

    #[test]
    fn test_locale_and_flavor_files_are_hashed_alike() {
        assert_eq!(path_prefix("customization/en-ZA.yml"), "r848382201");
        assert_eq!(path_prefix("customization/en-CHOCOLATE.yml"), "r975324452");
    }
}
