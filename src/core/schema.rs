//! Optional per-file schema descriptor.
//!
//! A resource file `dir/name.yml` may have a sibling `dir/name-schema.json`.
//! Only three fields are read from it; everything else in the document is
//! ignored.
//!
//! ```json
//! {
//!   "excludedKeys": ["do_not_read_me"],
//!   "useLocalizedDirectories": false,
//!   "outputFilenameMapping": { "de-DE": "./de.yml" }
//! }
//! ```

use std::{collections::BTreeMap, fs, io, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::{normalize_path, split_dir, split_extension};

pub const SCHEMA_SUFFIX: &str = "-schema.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
    #[serde(default)]
    pub excluded_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_localized_directories: Option<bool>,
    #[serde(default)]
    pub output_filename_mapping: BTreeMap<String, String>,
}

impl SchemaDescriptor {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Read a schema file. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read schema file: {}", path.display()));
            }
        };
        let schema = Self::from_json(&text)
            .with_context(|| format!("Failed to parse schema file: {}", path.display()))?;
        Ok(Some(schema))
    }
}

/// Path of the schema belonging to a resource file.
///
/// ```
/// use yamlloc::core::schema::schema_path;
///
/// assert_eq!(schema_path("foo/bar/x.yml"), "foo/bar/x-schema.json");
/// assert_eq!(schema_path("./test3.yml"), "test3-schema.json");
/// ```
pub fn schema_path(path: &str) -> String {
    let path = normalize_path(path);
    let (dir, file_name) = split_dir(&path);
    let (stem, _) = split_extension(file_name);
    if dir.is_empty() {
        format!("{}{}", stem, SCHEMA_SUFFIX)
    } else {
        format!("{}/{}{}", dir, stem, SCHEMA_SUFFIX)
    }
}

/// Answers the schema-driven questions for one file, falling back to the
/// defaults when the file has no schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaResolver {
    schema: Option<SchemaDescriptor>,
}

impl SchemaResolver {
    pub fn new(schema: Option<SchemaDescriptor>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> Option<&SchemaDescriptor> {
        self.schema.as_ref()
    }

    pub fn set_schema(&mut self, schema: Option<SchemaDescriptor>) {
        self.schema = schema;
    }

    pub fn excluded_keys(&self) -> &[String] {
        self.schema
            .as_ref()
            .map(|schema| schema.excluded_keys.as_slice())
            .unwrap_or_default()
    }

    /// Defaults to true, with or without a schema.
    pub fn use_localized_directories(&self) -> bool {
        self.schema
            .as_ref()
            .and_then(|schema| schema.use_localized_directories)
            .unwrap_or(true)
    }

    pub fn mapped_filename(&self, locale: &str) -> Option<&str> {
        self.schema
            .as_ref()
            .and_then(|schema| schema.output_filename_mapping.get(locale))
            .map(String::as_str)
    }

    /// The mapped file name for `locale`, or the file name of `path`.
    pub fn output_filename_for_locale(&self, path: &str, locale: &str) -> String {
        match self.mapped_filename(locale) {
            Some(mapped) => mapped.to_string(),
            None => {
                let path = normalize_path(path);
                split_dir(&path).1.to_string()
            }
        }
    }

    /// Where the `locale` copy of `path` goes.
    ///
    /// The locale directory and the file name mapping combine independently.
    /// A mapped name without a locale directory is returned as written.
    pub fn localized_path(&self, path: &str, locale: &str) -> String {
        let path = normalize_path(path);
        let (dir, _) = split_dir(&path);
        let use_dirs = self.use_localized_directories();

        match self.mapped_filename(locale) {
            Some(mapped) if use_dirs => normalize_path(&format!("{}/{}/{}", locale, dir, mapped)),
            Some(mapped) if dir.is_empty() => mapped.to_string(),
            Some(mapped) => normalize_path(&format!("{}/{}", dir, mapped)),
            None if use_dirs => normalize_path(&format!("{}/{}", locale, path)),
            None => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::core::schema::*;

    fn resolver(json: &str) -> SchemaResolver {
        SchemaResolver::new(Some(SchemaDescriptor::from_json(json).unwrap()))
    }

    #[test]
    fn test_defaults_without_schema() {
        let resolver = SchemaResolver::default();
        assert!(resolver.schema().is_none());
        assert!(resolver.excluded_keys().is_empty());
        assert!(resolver.use_localized_directories());
        assert_eq!(resolver.output_filename_for_locale("./test2.yml", "de-DE"), "test2.yml");
        assert_eq!(resolver.localized_path("./test2.yml", "de-DE"), "de-DE/test2.yml");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let resolver = resolver(
            r#"{"$schema": "http://json-schema.org/draft-07/schema#", "type": "object", "excludedKeys": ["do_not_read_me"]}"#,
        );
        assert_eq!(resolver.excluded_keys(), ["do_not_read_me".to_string()]);
        assert!(resolver.use_localized_directories());
    }

    #[test]
    fn test_localized_path_without_localized_directories() {
        let resolver = resolver(r#"{"useLocalizedDirectories": false}"#);
        assert_eq!(resolver.localized_path("./test3.yml", "de-DE"), "test3.yml");
        assert_eq!(resolver.localized_path("a/b/test3.yml", "de-DE"), "a/b/test3.yml");
    }

    #[test]
    fn test_filename_mapping_combines_with_directory_policy() {
        let with_dirs = resolver(
            r#"{"useLocalizedDirectories": true, "outputFilenameMapping": {"de-DE": "./de.yml"}}"#,
        );
        assert_eq!(with_dirs.localized_path("./test2.yml", "de-DE"), "de-DE/de.yml");
        assert_eq!(with_dirs.localized_path("sub/test2.yml", "de-DE"), "de-DE/sub/de.yml");
        assert_eq!(with_dirs.localized_path("./test2.yml", "fr-FR"), "fr-FR/test2.yml");

        let without_dirs = resolver(
            r#"{"useLocalizedDirectories": false, "outputFilenameMapping": {"de-DE": "./de.yml"}}"#,
        );
        assert_eq!(without_dirs.localized_path("./test2.yml", "de-DE"), "./de.yml");
        assert_eq!(without_dirs.localized_path("sub/test2.yml", "de-DE"), "sub/de.yml");
        assert_eq!(
            without_dirs.output_filename_for_locale("./test2.yml", "de-DE"),
            "./de.yml"
        );
    }

    #[test]
    fn test_load_missing_and_present() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x-schema.json");
        assert_eq!(SchemaDescriptor::load(&path).unwrap(), None);

        fs::write(&path, r#"{"excludedKeys": ["a", "b"]}"#).unwrap();
        let schema = SchemaDescriptor::load(&path).unwrap().unwrap();
        assert_eq!(schema.excluded_keys, vec!["a", "b"]);
    }

    #[test]
    fn test_load_malformed_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x-schema.json");
        fs::write(&path, "{ not json").unwrap();
        let error = SchemaDescriptor::load(&path).unwrap_err();
        assert!(error.to_string().contains("Failed to parse schema file"));
    }
}
