//! Interval overlap index for annocov.
//!
//! Annotation features are indexed per chromosome and feature type, then queried once per
//! sequencing read. A linear scan over every feature for every read does not scale to a
//! whole BAM file, so queries go through a sorted index that binary searches for the
//! first candidate and only scans the intervals that can actually overlap.
//!
//! ## Quick Start
//!
//! ```rust
//! use annocov_overlaprs::{Bits, Interval};
//!
//! // 1-based, inclusive intervals, e.g. exons of a transcript
//! let intervals = vec![
//!     Interval { start: 100u32, end: 200, val: "exon1" },
//!     Interval { start: 150, end: 300, val: "exon2" },
//!     Interval { start: 400, end: 500, val: "exon3" },
//! ];
//!
//! let index = Bits::build(intervals);
//!
//! assert_eq!(index.find_iter(180, 250).count(), 2);
//!
//! for interval in index.find_iter(180, 250) {
//!     println!("Found overlap: {:?}", interval);
//! }
//! ```

/// Binary Interval Search implementation.
///
/// See [`Bits`] for details.
pub mod bits;

// re-exports
pub use self::bits::{Bits, IterFind};
pub use annocov_core::models::Interval;
