use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("Invalid read record at line {line}: {reason}")]
    InvalidRead { line: usize, reason: String },

    #[error("Alignment record {record} is missing its {field}")]
    IncompleteAlignment { record: usize, field: &'static str },

    #[error("Unknown reference sequence id {0} in alignment file")]
    UnknownReference(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown output format '{0}', expected `tsv` or `json`")]
    UnknownFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl CoverageError {
    /// Whether the error concerns a single record, after which reading can go on
    pub fn is_record_error(&self) -> bool {
        !matches!(self, CoverageError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, CoverageError>;
