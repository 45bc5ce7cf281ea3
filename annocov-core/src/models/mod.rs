pub mod chromosome;
pub mod feature;
pub mod interval;
pub mod location;

// re-export for cleaner imports
pub use self::chromosome::{Chromosome, ChromosomeId, ChromosomeRegistry};
pub use self::feature::Feature;
pub use self::interval::Interval;
pub use self::location::{CompositeLocation, Location, SimpleLocation, Strand};
