//! yamlloc - localizable strings for YAML resource files
//!
//! yamlloc reads YAML resource files, picks out the values that are
//! human-readable text, and gives each one a stable key. Translations for those
//! keys can then be written back as localized copies of the files.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (parse, extract, serialize)
//! - `utils`: Shared utility functions
//!
//! ## Example
//!
//! ```
//! use yamlloc::core::{FileOptions, Project, YamlFile, YamlFileType};
//!
//! let file_type = YamlFileType::new(Project::new(".", "en-US")).unwrap();
//! let mut file = YamlFile::new(&file_type, FileOptions::default()).unwrap();
//! file.parse("greeting: Hello there\nid: home_page\n").unwrap();
//!
//! let units = file.translation_set();
//! assert_eq!(units.len(), 1);
//! assert_eq!(units.units()[0].key, "greeting");
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;
