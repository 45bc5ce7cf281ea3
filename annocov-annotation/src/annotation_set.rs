use std::collections::BTreeMap;
use std::ops::Range;

use fxhash::FxHashMap as HashMap;

use annocov_core::models::{Chromosome, ChromosomeId, ChromosomeRegistry, Feature, Interval};
use annocov_overlaprs::Bits;

///
/// Mutable half of an [AnnotationSet]: owns the chromosome registry and the
/// features added so far. Consumed by [AnnotationSetBuilder::build].
///
#[derive(Debug, Default)]
pub struct AnnotationSetBuilder {
    chromosomes: ChromosomeRegistry,
    features: Vec<Feature>,
}

impl AnnotationSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the chromosome called `name`, registering it if needed
    pub fn chromosome_id(&mut self, name: &str) -> ChromosomeId {
        self.chromosomes.get_or_insert(name)
    }

    pub fn chromosomes(&self) -> &ChromosomeRegistry {
        &self.chromosomes
    }

    /// Extend the chromosome `id` so it reaches at least `end`
    pub fn grow_chromosome(&mut self, id: ChromosomeId, end: u32) {
        self.chromosomes.grow(id, end);
    }

    /// Add a finished feature. Its chromosome grows to cover it.
    pub fn add_feature(&mut self, feature: Feature) {
        self.chromosomes.grow(feature.chromosome(), feature.end());
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    ///
    /// Freeze the set: sort features by type, chromosome and location and
    /// build one overlap index per (type, chromosome) pair.
    ///
    pub fn build(self) -> AnnotationSet {
        let mut features = self.features;
        features.sort_by(|a, b| {
            a.feature_type()
                .cmp(b.feature_type())
                .then(a.chromosome().cmp(&b.chromosome()))
                .then_with(|| a.location().cmp(b.location()))
        });

        let mut classes = BTreeMap::new();
        let mut offset = 0;
        for chunk in features.chunk_by(|a, b| a.feature_type() == b.feature_type()) {
            let mut intervals: HashMap<ChromosomeId, Vec<Interval<u32, usize>>> =
                HashMap::default();
            for (i, feature) in chunk.iter().enumerate() {
                intervals
                    .entry(feature.chromosome())
                    .or_default()
                    .push(Interval {
                        start: feature.start(),
                        end: feature.end(),
                        val: offset + i,
                    });
            }

            let by_chromosome = intervals
                .into_iter()
                .map(|(chr, chr_intervals)| (chr, Bits::build(chr_intervals)))
                .collect();

            classes.insert(
                chunk[0].feature_type().to_string(),
                ClassIndex {
                    range: offset..offset + chunk.len(),
                    by_chromosome,
                },
            );
            offset += chunk.len();
        }

        AnnotationSet {
            chromosomes: self.chromosomes,
            features,
            classes,
        }
    }
}

#[derive(Debug)]
struct ClassIndex {
    /// Where this type's features sit in the sorted feature list
    range: Range<usize>,
    /// Bounding boxes of the features per chromosome; values index the feature list
    by_chromosome: HashMap<ChromosomeId, Bits<u32, usize>>,
}

///
/// Every feature of an annotation file, indexed for overlap queries by type.
///
/// The set is immutable once built and can be shared between readers.
///
#[derive(Debug)]
pub struct AnnotationSet {
    chromosomes: ChromosomeRegistry,
    features: Vec<Feature>,
    classes: BTreeMap<String, ClassIndex>,
}

impl AnnotationSet {
    pub fn chromosomes(&self) -> &ChromosomeRegistry {
        &self.chromosomes
    }

    pub fn chromosome(&self, id: ChromosomeId) -> Option<&Chromosome> {
        self.chromosomes.get(id)
    }

    pub fn chromosome_id(&self, name: &str) -> Option<ChromosomeId> {
        self.chromosomes.id(name)
    }

    /// All features, sorted by type, chromosome and location
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Distinct feature types, in lexical order
    pub fn feature_types(&self) -> Vec<&str> {
        self.classes.keys().map(String::as_str).collect()
    }

    pub fn feature_class(&self, feature_type: &str) -> Option<FeatureClass<'_>> {
        self.classes
            .get_key_value(feature_type)
            .map(|(name, index)| FeatureClass {
                feature_type: name,
                features: &self.features,
                index,
            })
    }

    pub fn feature_classes(&self) -> impl Iterator<Item = FeatureClass<'_>> {
        self.classes.iter().map(|(name, index)| FeatureClass {
            feature_type: name,
            features: &self.features,
            index,
        })
    }
}

///
/// View over the features of one type.
///
#[derive(Debug, Clone, Copy)]
pub struct FeatureClass<'a> {
    feature_type: &'a str,
    features: &'a [Feature],
    index: &'a ClassIndex,
}

impl<'a> FeatureClass<'a> {
    pub fn feature_type(&self) -> &'a str {
        self.feature_type
    }

    /// Features of this type, sorted by chromosome and location
    pub fn features(&self) -> &'a [Feature] {
        &self.features[self.index.range.clone()]
    }

    pub fn len(&self) -> usize {
        self.index.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.range.is_empty()
    }

    ///
    /// Features of this type overlapping `[start, end]` (1-based, inclusive) on
    /// `chromosome`. The index narrows candidates by bounding box; each candidate
    /// is then checked against its exact location so introns never match.
    ///
    pub fn overlapping_features(
        &self,
        chromosome: ChromosomeId,
        start: u32,
        end: u32,
    ) -> impl Iterator<Item = &'a Feature> + use<'a> {
        let features = self.features;
        let index = self.index;
        index
            .by_chromosome
            .get(&chromosome)
            .into_iter()
            .flat_map(move |bits| bits.find_iter(start, end))
            .map(move |iv| &features[iv.val])
            .filter(move |feature| feature.overlaps(start, end))
    }

    /// Whether any feature of this type overlaps `[start, end]` on `chromosome`
    pub fn overlaps(&self, chromosome: ChromosomeId, start: u32, end: u32) -> bool {
        self.overlapping_features(chromosome, start, end)
            .next()
            .is_some()
    }

    /// Number of chromosomes carrying at least one feature of this type
    pub fn chromosome_count(&self) -> usize {
        self.index
            .by_chromosome
            .values()
            .filter(|bits| !bits.is_empty())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use annocov_core::models::{CompositeLocation, Location, SimpleLocation, Strand};
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn annotation() -> AnnotationSet {
        let mut builder = AnnotationSetBuilder::new();
        let chr1 = builder.chromosome_id("chr1");
        let chr2 = builder.chromosome_id("chr2");

        let spliced = CompositeLocation::new(vec![
            SimpleLocation::new(100, 200, Strand::Forward),
            SimpleLocation::new(400, 500, Strand::Forward),
        ])
        .unwrap();

        builder.add_feature(Feature::new("exon", chr1, spliced.into()));
        builder.add_feature(Feature::new("exon", chr1, Location::new(140, 170, Strand::Forward)));
        builder.add_feature(Feature::new("gene", chr1, Location::new(50, 900, Strand::Forward)));
        builder.add_feature(Feature::new("gene", chr2, Location::new(10, 20, Strand::Reverse)));
        builder.build()
    }

    #[rstest]
    fn test_feature_types_are_sorted(annotation: AnnotationSet) {
        assert_eq!(annotation.feature_types(), vec!["exon", "gene"]);
        assert_eq!(annotation.len(), 4);
        assert!(annotation.feature_class("CDS").is_none());
    }

    #[rstest]
    fn test_chromosome_lengths_follow_features(annotation: AnnotationSet) {
        let chr1 = annotation.chromosome_id("chr1").unwrap();
        let chr2 = annotation.chromosome_id("chr2").unwrap();
        assert_eq!(annotation.chromosome(chr1).unwrap().length(), 900);
        assert_eq!(annotation.chromosome(chr2).unwrap().length(), 20);
    }

    #[rstest]
    fn test_class_features_are_sorted(annotation: AnnotationSet) {
        let exons = annotation.feature_class("exon").unwrap();
        assert_eq!(exons.len(), 2);
        assert_eq!(exons.chromosome_count(), 1);
        let starts: Vec<u32> = exons.features().iter().map(|f| f.start()).collect();
        assert_eq!(starts, vec![100, 140]);
    }

    #[rstest]
    #[case(250, 300, 0)]
    #[case(150, 160, 2)]
    #[case(180, 450, 1)]
    #[case(501, 800, 0)]
    fn test_overlap_ignores_introns(
        annotation: AnnotationSet,
        #[case] start: u32,
        #[case] end: u32,
        #[case] hits: usize,
    ) {
        let chr1 = annotation.chromosome_id("chr1").unwrap();
        let exons = annotation.feature_class("exon").unwrap();
        assert_eq!(exons.overlapping_features(chr1, start, end).count(), hits);
        assert_eq!(exons.overlaps(chr1, start, end), hits > 0);
    }

    #[rstest]
    fn test_overlap_is_per_chromosome(annotation: AnnotationSet) {
        let chr2 = annotation.chromosome_id("chr2").unwrap();
        assert!(!annotation.feature_class("exon").unwrap().overlaps(chr2, 100, 200));
        assert!(annotation.feature_class("gene").unwrap().overlaps(chr2, 15, 15));
    }

    #[rstest]
    fn test_empty_set() {
        let set = AnnotationSetBuilder::new().build();
        assert!(set.is_empty());
        assert!(set.feature_types().is_empty());
        assert_eq!(set.feature_classes().count(), 0);
    }
}
