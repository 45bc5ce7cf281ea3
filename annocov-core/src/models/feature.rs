use std::cmp::Ordering;

use crate::models::{ChromosomeId, Location};

///
/// A typed, located annotation element (gene, mRNA, CDS, ...). The chromosome
/// is referenced by id; the registry that issued the id owns it.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    feature_type: String,
    chromosome: ChromosomeId,
    location: Location,
}

impl Feature {
    pub fn new(feature_type: &str, chromosome: ChromosomeId, location: Location) -> Self {
        Feature {
            feature_type: feature_type.to_string(),
            chromosome,
            location,
        }
    }

    pub fn feature_type(&self) -> &str {
        &self.feature_type
    }

    pub fn chromosome(&self) -> ChromosomeId {
        self.chromosome
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn start(&self) -> u32 {
        self.location.start()
    }

    pub fn end(&self) -> u32 {
        self.location.end()
    }

    #[inline]
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.location.overlaps(start, end)
    }
}

impl Ord for Feature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.location
            .cmp(&other.location)
            .then(self.chromosome.cmp(&other.chromosome))
            .then_with(|| self.feature_type.cmp(&other.feature_type))
    }
}

impl PartialOrd for Feature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
