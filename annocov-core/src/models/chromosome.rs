use std::collections::HashMap;
use std::fmt::{self, Display};
use std::ops::Index;

/// Index of a chromosome inside a [ChromosomeRegistry].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChromosomeId(usize);

impl ChromosomeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

///
/// A chromosome seen in an annotation file. The length is not known up front;
/// it is the largest end coordinate of any feature placed on it so far.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chromosome {
    name: String,
    length: u32,
}

impl Chromosome {
    pub fn new(name: &str) -> Self {
        Chromosome {
            name: name.to_string(),
            length: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Extend the chromosome so it reaches `end`. Never shrinks.
    pub fn grow_to(&mut self, end: u32) {
        if end > self.length {
            self.length = end;
        }
    }
}

impl Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.name, self.length)
    }
}

///
/// Deduplicated set of chromosomes keyed by name. Chromosomes are only ever
/// added or grown, never removed.
///
#[derive(Debug, Clone, Default)]
pub struct ChromosomeRegistry {
    chromosomes: Vec<Chromosome>,
    by_name: HashMap<String, ChromosomeId>,
}

impl ChromosomeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Get the id of the chromosome called `name`, registering it first if
    /// it has not been seen yet.
    ///
    pub fn get_or_insert(&mut self, name: &str) -> ChromosomeId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = ChromosomeId(self.chromosomes.len());
        self.chromosomes.push(Chromosome::new(name));
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn id(&self, name: &str) -> Option<ChromosomeId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: ChromosomeId) -> Option<&Chromosome> {
        self.chromosomes.get(id.0)
    }

    pub fn by_name(&self, name: &str) -> Option<&Chromosome> {
        self.id(name).and_then(|id| self.get(id))
    }

    pub fn grow(&mut self, id: ChromosomeId, end: u32) {
        if let Some(chr) = self.chromosomes.get_mut(id.0) {
            chr.grow_to(end);
        }
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Iterate over chromosomes in the order they were first seen
    pub fn iter(&self) -> impl Iterator<Item = (ChromosomeId, &Chromosome)> {
        self.chromosomes
            .iter()
            .enumerate()
            .map(|(i, chr)| (ChromosomeId(i), chr))
    }
}

impl Index<ChromosomeId> for ChromosomeRegistry {
    type Output = Chromosome;

    fn index(&self, id: ChromosomeId) -> &Self::Output {
        &self.chromosomes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_get_or_insert_deduplicates() {
        let mut registry = ChromosomeRegistry::new();
        let a = registry.get_or_insert("chr1");
        let b = registry.get_or_insert("chr2");
        let c = registry.get_or_insert("chr1");

        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry[b].name(), "chr2");
        assert_eq!(registry.id("chr3"), None);
    }

    #[rstest]
    fn test_length_only_grows() {
        let mut registry = ChromosomeRegistry::new();
        let id = registry.get_or_insert("chrX");
        assert_eq!(registry[id].length(), 0);

        registry.grow(id, 5000);
        registry.grow(id, 1200);
        assert_eq!(registry[id].length(), 5000);

        registry.grow(id, 7000);
        assert_eq!(registry.by_name("chrX").map(|c| c.length()), Some(7000));
    }

    #[rstest]
    fn test_iter_keeps_insertion_order() {
        let mut registry = ChromosomeRegistry::new();
        for name in ["chr2", "chr1", "chrM"] {
            registry.get_or_insert(name);
        }
        let names: Vec<&str> = registry.iter().map(|(_, c)| c.name()).collect();
        assert_eq!(names, vec!["chr2", "chr1", "chrM"]);
    }
}
