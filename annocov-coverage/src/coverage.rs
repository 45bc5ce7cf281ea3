use std::collections::BTreeMap;

use log::{info, warn};
use serde::Serialize;

use annocov_annotation::{AnnotationSet, FeatureClass};

use crate::errors::{CoverageError, Result};
use crate::reads::AlignedRead;

/// Report title of the feature coverage module
pub const NAME: &str = "Feature type read counts";
/// One line summary of what the counts mean
pub const DESCRIPTION: &str = "Tells how reads are distributed between feature types";
/// Number of invalid reads logged individually before the counter goes quiet
pub const MAX_LOGGED_WARNINGS: u64 = 50;

///
/// Counts, per feature type, the reads overlapping at least one feature of
/// that type. A read touching several features of one type still adds one to
/// that type; a read may add to several types.
///
/// The annotation is only borrowed, so several counters can run over the same
/// [AnnotationSet] (for example one per chromosome) and be combined with
/// [FeatureCounts::merge].
///
#[derive(Debug)]
pub struct FeatureCoverage<'a> {
    annotation: &'a AnnotationSet,
    classes: Vec<FeatureClass<'a>>,
    counts: Vec<u64>,
    /// requested types with no feature in the annotation
    absent: Vec<String>,
    reads: u64,
    unassigned: u64,
    unknown_chromosome: u64,
    invalid_reads: u64,
}

impl<'a> FeatureCoverage<'a> {
    /// Count reads against every feature type of `annotation`
    pub fn new(annotation: &'a AnnotationSet) -> Self {
        Self::with_classes(annotation, annotation.feature_classes().collect())
    }

    ///
    /// Count reads only against the listed feature types. Types missing from
    /// the annotation are reported with a count of zero.
    ///
    pub fn with_feature_types<S: AsRef<str>>(annotation: &'a AnnotationSet, types: &[S]) -> Self {
        let classes = annotation
            .feature_classes()
            .filter(|class| types.iter().any(|t| t.as_ref() == class.feature_type()))
            .collect();
        let mut coverage = Self::with_classes(annotation, classes);
        for missing in types
            .iter()
            .map(AsRef::as_ref)
            .filter(|t| annotation.feature_class(t).is_none())
        {
            warn!("Feature type '{}' does not occur in the annotation", missing);
            coverage.absent.push(missing.to_string());
        }
        coverage
    }

    fn with_classes(annotation: &'a AnnotationSet, classes: Vec<FeatureClass<'a>>) -> Self {
        let counts = vec![0; classes.len()];
        FeatureCoverage {
            annotation,
            classes,
            counts,
            absent: Vec::new(),
            reads: 0,
            unassigned: 0,
            unknown_chromosome: 0,
            invalid_reads: 0,
        }
    }

    ///
    /// Add one read to the counts.
    ///
    pub fn process_read<R: AlignedRead>(&mut self, read: &R) {
        self.reads += 1;

        let Some(chromosome) = self.annotation.chromosome_id(read.chrom()) else {
            self.unknown_chromosome += 1;
            self.unassigned += 1;
            return;
        };

        let mut assigned = false;
        for (class, count) in self.classes.iter().zip(self.counts.iter_mut()) {
            if class.overlaps(chromosome, read.start(), read.end()) {
                *count += 1;
                assigned = true;
            }
        }
        if !assigned {
            self.unassigned += 1;
        }
    }

    ///
    /// Drain a read source. Records the source could not decode are logged,
    /// counted as invalid and skipped; an I/O error stops the run.
    ///
    /// # Returns
    /// the number of reads processed by this call
    pub fn process_reads<I, R>(&mut self, reads: I) -> Result<u64>
    where
        I: IntoIterator<Item = Result<R>>,
        R: AlignedRead,
    {
        let before = self.reads;
        for read in reads {
            match read {
                Ok(read) => self.process_read(&read),
                Err(e) if e.is_record_error() => self.skip_invalid(&e),
                Err(e) => return Err(e),
            }
        }
        Ok(self.reads - before)
    }

    fn skip_invalid(&mut self, error: &CoverageError) {
        self.invalid_reads += 1;
        if self.invalid_reads <= MAX_LOGGED_WARNINGS {
            warn!("Skipping read. {}", error);
        }
        if self.invalid_reads == MAX_LOGGED_WARNINGS {
            warn!("Further invalid reads are not logged");
        }
    }

    pub fn reads_processed(&self) -> u64 {
        self.reads
    }

    pub fn finish(self) -> FeatureCounts {
        let mut counts: BTreeMap<String, u64> = self
            .classes
            .iter()
            .map(|class| class.feature_type().to_string())
            .zip(self.counts)
            .collect();
        for feature_type in self.absent {
            counts.entry(feature_type).or_insert(0);
        }

        info!(
            "Counted {} reads over {} feature types ({} unassigned, {} on unknown chromosomes)",
            self.reads,
            counts.len(),
            self.unassigned,
            self.unknown_chromosome
        );
        if self.invalid_reads > 0 {
            warn!("{} invalid reads were skipped", self.invalid_reads);
        }

        FeatureCounts {
            counts,
            reads: self.reads,
            unassigned: self.unassigned,
            unknown_chromosome: self.unknown_chromosome,
            invalid_reads: self.invalid_reads,
        }
    }
}

///
/// Result of a [FeatureCoverage] run: reads per feature type, in type order.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureCounts {
    counts: BTreeMap<String, u64>,
    reads: u64,
    unassigned: u64,
    unknown_chromosome: u64,
    invalid_reads: u64,
}

impl FeatureCounts {
    pub fn get(&self, feature_type: &str) -> Option<u64> {
        self.counts.get(feature_type).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(t, c)| (t.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Reads that overlapped no counted feature type
    pub fn unassigned(&self) -> u64 {
        self.unassigned
    }

    /// Reads whose chromosome is absent from the annotation
    pub fn unknown_chromosome(&self) -> u64 {
        self.unknown_chromosome
    }

    /// Records the read source could not decode; not part of [Self::reads]
    pub fn invalid_reads(&self) -> u64 {
        self.invalid_reads
    }

    ///
    /// Sum the counts of another run into this one, e.g. from a worker that
    /// processed a disjoint set of reads.
    ///
    pub fn merge(&mut self, other: FeatureCounts) {
        for (feature_type, count) in other.counts {
            *self.counts.entry(feature_type).or_default() += count;
        }
        self.reads += other.reads;
        self.unassigned += other.unassigned;
        self.unknown_chromosome += other.unknown_chromosome;
        self.invalid_reads += other.invalid_reads;
    }
}
