//! # Feature coverage
//!
//! Counts how sequencing reads distribute over the feature types of an
//! annotation: for every type, the number of reads overlapping at least one
//! feature of that type. Spliced features only count reads landing in one of
//! their parts, so intronic reads are not attributed to exon-level types.
//!
//! ```rust,no_run
//! use annocov_annotation::parse_annotation;
//! use annocov_coverage::{BedReadReader, FeatureCoverage};
//!
//! let annotation = parse_annotation("genes.gff3").unwrap();
//! let mut coverage = FeatureCoverage::new(&annotation);
//! coverage
//!     .process_reads(BedReadReader::from_path("reads.bed").unwrap())
//!     .unwrap();
//!
//! for (feature_type, reads) in coverage.finish().iter() {
//!     println!("{}\t{}", feature_type, reads);
//! }
//! ```
#[cfg(feature = "bam")]
pub mod bam;
pub mod config;
pub mod coverage;
pub mod errors;
pub mod reads;

#[cfg(feature = "bam")]
pub use bam::{BamReadReader, open_bam};
pub use config::{CoverageConfig, OutputFormat};
pub use coverage::{FeatureCounts, FeatureCoverage};
pub use errors::{ConfigError, CoverageError};
pub use reads::{AlignedRead, BedReadReader, ReadRecord};
