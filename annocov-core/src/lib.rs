//! Core models shared by the annocov crates.
//!
//! - [`models::Location`]: a 1-based, inclusive genomic location, either a single
//!   stretch or a spliced composite of several stretches.
//! - [`models::ChromosomeRegistry`]: chromosomes deduplicated by name, with lengths that
//!   grow as features are placed on them.
//! - [`models::Feature`]: a typed feature referencing its chromosome by id.
//! - [`models::Interval`]: the plain closed interval used by the overlap index.
pub mod errors;
pub mod models;
pub mod utils;
