//! The extraction engine.
//!
//! A resource file moves through the pipeline in three steps:
//! - Parsing: `parser` reads the text into a `document` tree that keeps the
//!   comment lines in front of each entry
//! - Extraction: `extractor` walks the tree, asks `classifier` which leaves are
//!   text, builds keys with `key_path` and notes with `comments`
//! - Serialization: `serializer` turns units back into a document, either from
//!   scratch or by localizing a parsed tree
//!
//! `mapping`, `schema` and `file_type` decide which files are read and where
//! their localized copies go; `file` ties everything together for one file.

pub mod classifier;
pub mod comments;
pub mod document;
pub mod error;
pub mod extractor;
pub mod file;
pub mod file_type;
pub mod key_path;
pub mod mapping;
pub mod parser;
pub mod project;
pub mod schema;
pub mod serializer;
pub mod unit;

pub use error::Error;
pub use extractor::Extractor;
pub use file::{FileOptions, YamlFile};
pub use file_type::YamlFileType;
pub use project::Project;
pub use schema::{SchemaDescriptor, SchemaResolver};
pub use unit::{TranslationSet, TranslationUnit, UnitText};
