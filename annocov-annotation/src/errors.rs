use thiserror::Error;

use annocov_core::errors::LocationError;

/// Fatal errors: the annotation file could not be opened or read.
#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Failed to read annotation line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

///
/// Recoverable problems with a single line or attribute token. The parser
/// logs them and carries on with the rest of the file.
///
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Line {line}: expected at least 5 tab-separated columns, found {found}")]
    MissingColumns { line: usize, found: usize },

    #[error("Line {line}: {source}")]
    InvalidLocation { line: usize, source: LocationError },

    #[error("Line {line}: Parent attribute names no id")]
    EmptyParent { line: usize },

    #[error("Line {line}: no key value delimiter in attribute '{token}'")]
    MalformedAttribute { line: usize, token: String },

    #[error("Line {line}: {feature_type} on {found} cannot join '{group}' which lives on {expected}")]
    ChromosomeMismatch {
        line: usize,
        feature_type: String,
        group: String,
        expected: String,
        found: String,
    },
}

impl FormatError {
    /// Whether the whole line was dropped (as opposed to a single attribute token or part)
    pub fn skips_line(&self) -> bool {
        matches!(
            self,
            FormatError::MissingColumns { .. }
                | FormatError::InvalidLocation { .. }
                | FormatError::EmptyParent { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AnnotationError>;
