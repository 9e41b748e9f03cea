//! Project-wide settings every resource file is read against.

use std::path::PathBuf;

use crate::core::mapping::MappingRule;
use crate::utils::{has_region_or_script, normalize_path, split_dir, split_extension};

#[derive(Debug, Clone)]
pub struct Project {
    /// Directory resource paths are relative to.
    pub root: PathBuf,
    pub source_locale: String,
    /// Target locales.
    pub locales: Vec<String>,
    pub flavors: Vec<String>,
    /// Mapping rules in declaration order.
    pub mappings: Vec<(String, MappingRule)>,
    /// Globs of resource paths to leave alone.
    pub ignores: Vec<String>,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, source_locale: &str) -> Self {
        Self {
            root: root.into(),
            source_locale: source_locale.to_string(),
            locales: Vec::new(),
            flavors: Vec::new(),
            mappings: Vec::new(),
            ignores: Vec::new(),
        }
    }

    /// Source locale first, then the targets.
    pub fn all_locales(&self) -> Vec<&str> {
        std::iter::once(self.source_locale.as_str())
            .chain(self.locales.iter().map(String::as_str))
            .collect()
    }

    /// Is `text` a locale this project knows, or a full locale tag?
    ///
    /// Bare language codes only count when configured, so a directory named
    /// `foo` or `app` is not taken for a locale.
    pub fn is_locale(&self, text: &str) -> bool {
        self.all_locales().contains(&text) || has_region_or_script(text)
    }

    /// The flavor named by a `-FLAVOR` suffix on the file stem, if it is one
    /// of the configured flavors. Matching is case-sensitive.
    pub fn detect_flavor(&self, path: &str) -> Option<String> {
        let path = normalize_path(path);
        let (_, file_name) = split_dir(&path);
        let (stem, _) = split_extension(file_name);
        let (_, suffix) = stem.rsplit_once('-')?;
        self.flavors
            .iter()
            .find(|flavor| flavor.as_str() == suffix)
            .cloned()
    }
}
