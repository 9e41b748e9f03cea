//! One YAML resource file: its settings, parsed document and units.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::core::comments::CommentTracker;
use crate::core::document::{DocumentNode, Scalar};
use crate::core::error;
use crate::core::extractor::Extractor;
use crate::core::file_type::YamlFileType;
use crate::core::key_path::path_prefix;
use crate::core::mapping::Mapping;
use crate::core::parser;
use crate::core::schema::{self, SchemaDescriptor, SchemaResolver};
use crate::core::serializer::{self, EMPTY_DOCUMENT};
use crate::core::unit::{TranslationSet, TranslationUnit};
use crate::utils::normalize_path;

#[derive(Debug, Clone, Default)]
pub struct FileOptions {
    /// Path relative to the project root.
    pub path_name: Option<String>,
    /// Locale of the file's text. Defaults to the project source locale.
    pub locale: Option<String>,
    /// Overrides the flavor detected from the file name.
    pub flavor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct YamlFile<'a> {
    file_type: &'a YamlFileType,
    path: Option<String>,
    locale: String,
    flavor: Option<String>,
    mapping: Option<&'a Mapping>,
    schema: SchemaResolver,
    document: Option<DocumentNode>,
    units: TranslationSet,
}

impl<'a> YamlFile<'a> {
    /// Set up a file, reading its schema if one exists next to it.
    pub fn new(file_type: &'a YamlFileType, options: FileOptions) -> Result<Self> {
        let project = file_type.project();
        let path = options.path_name.as_deref().map(normalize_path);
        let locale = options
            .locale
            .unwrap_or_else(|| project.source_locale.clone());
        let flavor = options
            .flavor
            .or_else(|| path.as_deref().and_then(|path| project.detect_flavor(path)));
        let mapping = path
            .as_deref()
            .and_then(|path| file_type.mappings().resolve(path));

        let schema = match path.as_deref() {
            Some(path) => SchemaDescriptor::load(&project.root.join(schema::schema_path(path)))?,
            None => None,
        };

        Ok(Self {
            file_type,
            path,
            locale,
            flavor,
            mapping,
            schema: SchemaResolver::new(schema),
            document: None,
            units: TranslationSet::new(),
        })
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn flavor(&self) -> Option<&str> {
        self.flavor.as_deref()
    }

    /// The mapping rule this file falls under.
    pub fn mapping(&self) -> Option<&'a Mapping> {
        self.mapping
    }

    /// True when the file holds translations rather than source strings.
    pub fn is_target(&self) -> bool {
        self.locale != self.file_type.project().source_locale
    }

    pub fn schema_path(&self) -> Option<String> {
        self.path.as_deref().map(schema::schema_path)
    }

    pub fn schema(&self) -> Option<&SchemaDescriptor> {
        self.schema.schema()
    }

    pub fn set_schema(&mut self, schema: Option<SchemaDescriptor>) {
        self.schema.set_schema(schema);
    }

    pub fn excluded_keys_from_schema(&self) -> &[String] {
        self.schema.excluded_keys()
    }

    pub fn use_localized_directories(&self) -> bool {
        self.schema.use_localized_directories()
    }

    pub fn comment_prefix(&self) -> Option<&str> {
        self.mapping.and_then(Mapping::comment_prefix)
    }

    pub fn output_filename_for_locale(&self, locale: &str) -> String {
        self.schema
            .output_filename_for_locale(self.path.as_deref().unwrap_or_default(), locale)
    }

    /// Where the `locale` copy of this file is written, relative to the
    /// output directory. A mapping template takes precedence over the schema.
    pub fn localized_path(&self, locale: &str) -> String {
        let path = self.path.as_deref().unwrap_or_default();
        match self.mapping {
            Some(mapping) => mapping.render(path, locale),
            None => self.schema.localized_path(path, locale),
        }
    }

    /// The `r<hash>` key segment identifying this file.
    pub fn key_prefix(&self) -> Option<String> {
        self.path.as_deref().map(path_prefix)
    }

    /// An extractor configured for this file.
    pub fn extractor(&self) -> Extractor {
        let prefix = self.key_prefix();
        let target_locale = self.is_target().then_some(self.locale.as_str());
        let mut extractor = Extractor::new(&self.file_type.project().source_locale)
            .with_target_locale(target_locale)
            .with_prefix(prefix.as_deref())
            .with_flavor(self.flavor.as_deref())
            .with_path(self.path.as_deref())
            .with_excluded_keys(self.schema.excluded_keys().iter().cloned())
            .with_comments(CommentTracker::new(self.comment_prefix()));
        if let Some(mapping) = self.mapping {
            extractor = extractor.with_excluded_keys(mapping.excluded_keys().iter().cloned());
        }
        extractor
    }

    /// Parse `text` as the contents of this file, replacing earlier units.
    pub fn parse(&mut self, text: &str) -> error::Result<()> {
        let document = parser::parse(text)?;
        self.units.clear();
        self.units.extend(self.extractor().extract(&document));
        self.document = Some(document);
        Ok(())
    }

    /// Read and parse the file from disk, replacing earlier units.
    ///
    /// A file without a path, or one that is missing or unreadable, leaves
    /// the set empty. Only a parse failure is an error.
    pub fn extract(&mut self) -> Result<()> {
        self.units.clear();
        self.document = None;
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        let full_path = self.file_type.project().root.join(&path);
        let Ok(text) = fs::read_to_string(&full_path) else {
            return Ok(());
        };
        self.parse(&text)
            .with_context(|| format!("Failed to parse file: {}", path))
    }

    /// Read the translations of a localized copy of this file.
    ///
    /// Each unit of `text` whose key this file already has sets that unit's
    /// `locale` target. Returns the number of units updated.
    pub fn parse_output_file(&mut self, text: &str, locale: &str) -> error::Result<usize> {
        let document = parser::parse(text)?;
        let mut updated = 0;
        for unit in self.extractor().extract(&document) {
            if self.units.set_target(&unit.key, unit.source, locale) {
                updated += 1;
            }
        }
        Ok(updated)
    }

    pub fn translation_set(&self) -> &TranslationSet {
        &self.units
    }

    pub fn add_unit(&mut self, unit: TranslationUnit) {
        self.units.add(unit);
    }

    /// Render the units of this file as a document.
    pub fn content(&self) -> error::Result<String> {
        serializer::serialize(self.units.iter(), self.key_prefix().as_deref(), None, None)
    }

    /// Re-emit the parsed document with translatable leaves replaced by their
    /// `locale` translations. Leaves without one keep their text.
    pub fn localize_text(&self, translations: &TranslationSet, locale: &str) -> String {
        let Some(document) = &self.document else {
            return EMPTY_DOCUMENT.to_string();
        };
        let extractor = self.extractor();
        let localized = serializer::localize_tree(document, &mut |path, scalar| {
            if !extractor.accepts(path, scalar) {
                return None;
            }
            let key = extractor.key_for(path)?;
            let target = translations.get_translation(&key, locale)?.target_text()?;
            Some(Scalar::Str(target.to_string()))
        });
        serializer::to_yaml(&localized)
    }

    /// Write the `locale` copy of this file under `output_dir`.
    pub fn localize(
        &self,
        translations: &TranslationSet,
        locale: &str,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let output_path = output_dir.join(self.localized_path(locale));
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&output_path, self.localize_text(translations, locale))
            .with_context(|| format!("Failed to write file: {}", output_path.display()))?;
        Ok(output_path)
    }
}
