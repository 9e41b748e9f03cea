//! Translation units and the set that stores them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// The text of a unit: a single string or a set of plural variants
/// (`one`, `few`, `other`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum UnitText {
    Single(String),
    Plural(BTreeMap<String, String>),
}

impl UnitText {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            UnitText::Single(text) => Some(text),
            UnitText::Plural(_) => None,
        }
    }
}

impl From<&str> for UnitText {
    fn from(text: &str) -> Self {
        UnitText::Single(text.to_string())
    }
}

impl From<String> for UnitText {
    fn from(text: String) -> Self {
        UnitText::Single(text)
    }
}

/// One localizable string with its key and locale metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationUnit {
    pub key: String,
    pub source: UnitText,
    pub source_locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<UnitText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_locale: Option<String>,
    /// Translator note. `Some("")` means a blank comment line was present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    /// File the unit was extracted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default = "default_localizable")]
    pub localizable: bool,
}

fn default_localizable() -> bool {
    true
}

impl TranslationUnit {
    pub fn new(key: impl Into<String>, source: impl Into<UnitText>, source_locale: &str) -> Self {
        Self {
            key: key.into(),
            source: source.into(),
            source_locale: source_locale.to_string(),
            target: None,
            target_locale: None,
            comment: None,
            flavor: None,
            path: None,
            localizable: true,
        }
    }

    /// A translation of `key` into `locale`, as read from a translation list.
    pub fn translation(key: impl Into<String>, target: impl Into<UnitText>, locale: &str) -> Self {
        let target = target.into();
        Self {
            target: Some(target.clone()),
            target_locale: Some(locale.to_string()),
            ..Self::new(key, target, "")
        }
    }

    /// The source string when the unit is not plural.
    pub fn source_text(&self) -> Option<&str> {
        self.source.as_str()
    }

    pub fn target_text(&self) -> Option<&str> {
        self.target.as_ref().and_then(UnitText::as_str)
    }
}

/// An ordered collection of units, indexed by `(key, target locale)`.
///
/// Adding a unit whose key and target locale are already present replaces the
/// earlier one in place, so insertion order is kept.
#[derive(Debug, Clone, Default)]
pub struct TranslationSet {
    units: Vec<TranslationUnit>,
    index: HashMap<(String, Option<String>), usize>,
}

impl TranslationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, unit: TranslationUnit) {
        let id = (unit.key.clone(), unit.target_locale.clone());
        match self.index.get(&id) {
            Some(&position) => self.units[position] = unit,
            None => {
                self.index.insert(id, self.units.len());
                self.units.push(unit);
            }
        }
    }

    pub fn extend(&mut self, units: impl IntoIterator<Item = TranslationUnit>) {
        for unit in units {
            self.add(unit);
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn clear(&mut self) {
        self.units.clear();
        self.index.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranslationUnit> {
        self.units.iter()
    }

    pub fn units(&self) -> &[TranslationUnit] {
        &self.units
    }

    /// First unit with this key, whatever its locale.
    pub fn get_by_key(&self, key: &str) -> Option<&TranslationUnit> {
        self.index
            .get(&(key.to_string(), None))
            .map(|&position| &self.units[position])
            .or_else(|| self.units.iter().find(|unit| unit.key == key))
    }

    /// First unit whose (non-plural) source equals `source`.
    pub fn get_by_source(&self, source: &str) -> Option<&TranslationUnit> {
        self.units
            .iter()
            .find(|unit| unit.source_text() == Some(source))
    }

    /// Units written in `locale`: translations into it, or sources in it.
    pub fn get_by_locale(&self, locale: &str) -> Vec<&TranslationUnit> {
        self.units
            .iter()
            .filter(|unit| match &unit.target_locale {
                Some(target) => target == locale,
                None => unit.source_locale == locale,
            })
            .collect()
    }

    /// The translation of `key` into `locale`.
    pub fn get_translation(&self, key: &str, locale: &str) -> Option<&TranslationUnit> {
        self.index
            .get(&(key.to_string(), Some(locale.to_string())))
            .map(|&position| &self.units[position])
    }

    /// Record `target` as the `locale` text of `key`.
    ///
    /// An existing translation is updated; otherwise the source unit of `key`
    /// becomes the translation. Returns false when `key` is unknown.
    pub fn set_target(&mut self, key: &str, target: UnitText, locale: &str) -> bool {
        let translated = (key.to_string(), Some(locale.to_string()));
        if let Some(&position) = self.index.get(&translated) {
            self.units[position].target = Some(target);
            return true;
        }
        let Some(position) = self.index.remove(&(key.to_string(), None)) else {
            return false;
        };
        let unit = &mut self.units[position];
        unit.target = Some(target);
        unit.target_locale = Some(locale.to_string());
        self.index.insert(translated, position);
        true
    }
}

impl IntoIterator for TranslationSet {
    type Item = TranslationUnit;
    type IntoIter = std::vec::IntoIter<TranslationUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter()
    }
}

impl FromIterator<TranslationUnit> for TranslationSet {
    fn from_iter<I: IntoIterator<Item = TranslationUnit>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
