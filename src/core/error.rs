use thiserror::Error;

/// Errors raised by the extraction and serialization engine.
///
/// File-system failures are not represented here; callers that touch the
/// disk wrap these in `anyhow` with the offending path as context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The document text is not valid for the supported YAML subset.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A key path addresses sequence indices that do not run densely from 0.
    #[error("key '{key}' addresses a sequence whose indices are not contiguous from 0")]
    SparseSequence { key: String },

    /// A key path is used both as a leaf and as a container.
    #[error("key '{key}' is used both as a value and as a parent of other keys")]
    ConflictingKey { key: String },

    /// A mapping rule template refers to a token that does not exist.
    #[error("mapping \"{pattern}\" uses unknown template token [{token}]")]
    UnknownTemplateToken { pattern: String, token: String },

    /// A mapping rule pattern is not a valid glob.
    #[error("invalid glob pattern \"{pattern}\": {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
