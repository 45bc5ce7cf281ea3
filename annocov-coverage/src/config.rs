use std::fmt::{self, Display};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tsv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Tsv => write!(f, "tsv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

///
/// A coverage run described in a TOML file:
///
/// ```toml
/// annotation = "genes.gff3.gz"
/// reads = "sample.bam"
/// feature_types = ["mRNA", "CDS"]
/// output = "json"
/// ```
///
/// Relative paths are taken as they are written; command line flags take
/// precedence over every field.
///
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageConfig {
    pub annotation: Option<PathBuf>,
    pub reads: Option<PathBuf>,
    pub feature_types: Option<Vec<String>>,
    pub output: Option<OutputFormat>,
}

impl CoverageConfig {
    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }
}

impl TryFrom<&Path> for CoverageConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}
