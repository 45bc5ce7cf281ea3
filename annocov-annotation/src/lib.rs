//! # GFF3/GTF annotation parsing for annocov
//!
//! Reads gene annotation files in either dialect, reassembles features that
//! are spread over several lines (exons of one transcript, CDS segments) into
//! single spliced features, and indexes the result per feature type for
//! overlap queries.
//!
//! ```rust,no_run
//! use annocov_annotation::parse_annotation;
//!
//! let annotation = parse_annotation("genes.gtf.gz").unwrap();
//! for feature_type in annotation.feature_types() {
//!     println!("{}", feature_type);
//! }
//! ```
pub mod annotation_set;
pub mod attributes;
pub mod errors;
pub mod grouping;
pub mod parser;

pub use annotation_set::{AnnotationSet, AnnotationSetBuilder, FeatureClass};
pub use errors::{AnnotationError, FormatError};
pub use parser::{AnnotationParser, ParseStats, parse_annotation};
