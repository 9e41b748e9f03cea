//! Turns a parsed document into translation units.

use std::collections::HashSet;

use crate::core::classifier::is_translatable;
use crate::core::comments::CommentTracker;
use crate::core::document::{DocumentNode, LeadingComment, Scalar, Visitor};
use crate::core::key_path::KeyPath;
use crate::core::unit::{TranslationUnit, UnitText};
use crate::utils::hash_key;

/// Extraction settings for one file.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    source_locale: String,
    /// Set when the file holds translations rather than source strings.
    target_locale: Option<String>,
    prefix: Option<String>,
    flavor: Option<String>,
    path: Option<String>,
    excluded_keys: HashSet<String>,
    comments: CommentTracker,
}

impl Extractor {
    pub fn new(source_locale: &str) -> Self {
        Self {
            source_locale: source_locale.to_string(),
            ..Default::default()
        }
    }

    pub fn with_target_locale(mut self, locale: Option<&str>) -> Self {
        self.target_locale = locale.map(str::to_string);
        self
    }

    /// Leading key segment, normally the `r<hash>` of the file path.
    pub fn with_prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = prefix.map(str::to_string);
        self
    }

    pub fn with_flavor(mut self, flavor: Option<&str>) -> Self {
        self.flavor = flavor.map(str::to_string);
        self
    }

    pub fn with_path(mut self, path: Option<&str>) -> Self {
        self.path = path.map(str::to_string);
        self
    }

    /// Add leaf key names to skip. Repeated calls accumulate.
    pub fn with_excluded_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_comments(mut self, comments: CommentTracker) -> Self {
        self.comments = comments;
        self
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn is_excluded(&self, path: &KeyPath) -> bool {
        path.reskey()
            .is_some_and(|reskey| self.excluded_keys.contains(&reskey))
    }

    /// Full key of the leaf at `path`.
    ///
    /// A scalar document in a file without a path is keyed by the hash of
    /// the empty path.
    pub fn key_for(&self, path: &KeyPath) -> Option<String> {
        match self.prefix.as_deref() {
            None if path.is_empty() => Some(hash_key("")),
            prefix => path.to_key(prefix),
        }
    }

    /// Whether the leaf at `path` would become a unit.
    pub fn accepts(&self, path: &KeyPath, scalar: &Scalar) -> bool {
        !self.is_excluded(path) && is_translatable(scalar)
    }

    /// Collect the units of a document, in document order.
    pub fn extract(&self, root: &DocumentNode) -> Vec<TranslationUnit> {
        let mut collector = Collector {
            extractor: self,
            units: Vec::new(),
        };
        root.walk(&mut collector);
        collector.units
    }

    fn unit(&self, key: String, text: &str, comment: Option<&LeadingComment>) -> TranslationUnit {
        let mut unit = TranslationUnit::new(key, text, &self.source_locale);
        if let Some(locale) = &self.target_locale {
            unit.target = Some(UnitText::Single(text.to_string()));
            unit.target_locale = Some(locale.clone());
        }
        unit.comment = self.comments.resolve(comment);
        unit.flavor = self.flavor.clone();
        unit.path = self.path.clone();
        unit
    }
}

struct Collector<'a> {
    extractor: &'a Extractor,
    units: Vec<TranslationUnit>,
}

impl Visitor for Collector<'_> {
    fn visit_scalar(&mut self, path: &KeyPath, scalar: &Scalar, comment: Option<&LeadingComment>) {
        if !self.extractor.accepts(path, scalar) {
            return;
        }
        let (Some(key), Some(text)) = (self.extractor.key_for(path), scalar.as_str()) else {
            return;
        };
        let unit = self.extractor.unit(key, text, comment);
        self.units.push(unit);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::extractor::*;
    use crate::core::parser::parse;

    fn extract(extractor: &Extractor, text: &str) -> Vec<TranslationUnit> {
        extractor.extract(&parse(text).unwrap())
    }

    fn keys(units: &[TranslationUnit]) -> Vec<&str> {
        units.iter().map(|unit| unit.key.as_str()).collect()
    }

    #[test]
    fn test_simple_document() {
        let units = extract(
            &Extractor::new("en-US"),
            "Jobs: Jobs\nOur_internship_program: Our internship program\n",
        );
        assert_eq!(keys(&units), vec!["Jobs", "Our_internship_program"]);
        assert_eq!(units[1].source_text(), Some("Our internship program"));
        assert_eq!(units[0].source_locale, "en-US");
        assert!(units.iter().all(|unit| unit.comment.is_none()));
        assert!(units.iter().all(|unit| unit.target.is_none()));
    }

    #[test]
    fn test_prefix_and_escaped_keys() {
        let units = extract(
            &Extractor::new("en-US").with_prefix(Some("r123")),
            "'foo/bar/x.en-US.html.haml':\n  r9834724545: Jobs\n",
        );
        assert_eq!(keys(&units), vec!["r123.foo/bar/x\\.en-US\\.html\\.haml.r9834724545"]);
    }

    #[test]
    fn test_top_level_scalar_gets_a_hash_key() {
        let units = extract(&Extractor::new("en-US"), "Just a sentence here\n");
        assert_eq!(keys(&units), vec!["r0"]);

        let units = extract(
            &Extractor::new("en-US").with_prefix(Some("r42")),
            "Just a sentence here\n",
        );
        assert_eq!(keys(&units), vec!["r42"]);
    }

    #[test]
    fn test_non_text_values_are_skipped() {
        let units = extract(
            &Extractor::new("en-US"),
            "credit_card_expired:\n  \
             subject: \"ALERT: Your %1 credit card has expired\"\n  \
             global_link: member_settings\n  \
             sms_data: \"\"\n  \
             expert_campaign: 2\n  \
             setting_name: credit_card_updates\n  \
             daily_limit_exception_email: true\n  \
             symbol: :see_support_rep\n",
        );
        assert_eq!(keys(&units), vec!["credit_card_expired.subject"]);
    }

    #[test]
    fn test_sequences_use_indices() {
        let units = extract(
            &Extractor::new("en-US"),
            "---\n#first level comment\nJobs:\n  - one and\n  #second level comment\n  - two and\n",
        );
        assert_eq!(keys(&units), vec!["Jobs.0", "Jobs.1"]);
        assert_eq!(units[0].comment, None);
        assert_eq!(units[1].comment.as_deref(), Some("second level comment"));
    }

    #[test]
    fn test_excluded_keys_match_the_last_segment() {
        let extractor = Extractor::new("en-US").with_excluded_keys(["do_not_read_me"]);
        let units = extract(
            &extractor,
            "a:\n  do_not_read_me: bad words here\n  read_me: good words here\ndo_not_read_me:\n  nested: still read this\n",
        );
        assert_eq!(keys(&units), vec!["a.read_me", "do_not_read_me.nested"]);
    }

    #[test]
    fn test_excluded_keys_accumulate() {
        let extractor = Extractor::new("en-US")
            .with_excluded_keys(["a"])
            .with_excluded_keys(["b"]);
        let units = extract(&extractor, "a: some text\nb: more text\nc: other text\n");
        assert_eq!(keys(&units), vec!["c"]);
    }

    #[test]
    fn test_target_locale_units() {
        let units = extract(
            &Extractor::new("en-US").with_target_locale(Some("es-US")),
            "a: foobar\nb: barfoo\n",
        );
        assert_eq!(units[0].target_text(), Some("foobar"));
        assert_eq!(units[0].target_locale.as_deref(), Some("es-US"));
        assert_eq!(units[0].source_locale, "en-US");
    }

    #[test]
    fn test_flavor_and_path_are_copied() {
        let units = extract(
            &Extractor::new("en-US")
                .with_flavor(Some("CHOCOLATE"))
                .with_path(Some("customization/en-CHOCOLATE.yml")),
            "a: foobar\n",
        );
        assert_eq!(units[0].flavor.as_deref(), Some("CHOCOLATE"));
        assert_eq!(units[0].path.as_deref(), Some("customization/en-CHOCOLATE.yml"));
    }

    #[test]
    fn test_comment_prefix() {
        let extractor =
            Extractor::new("en-US").with_comments(CommentTracker::new(Some("L10N:")));
        let units = extract(
            &extractor,
            "#L10N: Prefixed comment\n\
             first: \"string\"\n\
             #  L10N:Prefixed comment with spaces before \n\
             second: \"string\"\n\
             # Not prefixed comment with L10N in it \n\
             third: \"string\"",
        );
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].comment.as_deref(), Some("Prefixed comment"));
        assert_eq!(units[1].comment.as_deref(), Some("Prefixed comment with spaces before"));
        assert_eq!(units[2].comment, None);
    }

    #[test]
    fn test_comment_does_not_reach_nested_leaves() {
        let units = extract(
            &Extractor::new("en-US"),
            "#first_a comment\nfirst_a:\n  second_a: \"second a\"\n  #second_b comment\n  second_b: \"second b\"\n",
        );
        assert_eq!(units[0].comment, None);
        assert_eq!(units[1].comment.as_deref(), Some("second_b comment"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let document = parse("a:\n  # note\n  b: some text\n  c:\n    - more text\n").unwrap();
        let extractor = Extractor::new("en-US").with_prefix(Some("r1"));
        assert_eq!(extractor.extract(&document), extractor.extract(&document));
    }
}
