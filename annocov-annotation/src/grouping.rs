//! Reassembly of features that are split over several lines.
//!
//! A transcript is usually written as one line per exon, linked by a shared
//! `Parent` (GFF3) or `transcript_id` (GTF), and the line defining the parent
//! itself may come before or after its children. Lines are therefore collected
//! into [`FeatureGroup`]s while the file is read, and only turned into
//! [`Feature`]s once the whole file has been seen, by consuming the
//! [`FeatureGrouper`] with [`FeatureGrouper::finish`].

use fxhash::FxHashMap as HashMap;
use log::warn;

use annocov_core::models::{
    ChromosomeId, ChromosomeRegistry, CompositeLocation, Feature, Location, SimpleLocation,
};

///
/// One feature under construction.
///
/// `seeds` are locations coming from lines that define the feature itself
/// (an `ID` line); `parts` come from child lines pointing at it. Children
/// win: once any part is known the seed location is only a bounding box.
///
#[derive(Debug, Clone)]
pub struct FeatureGroup {
    feature_type: String,
    group_id: String,
    chromosome: ChromosomeId,
    seeds: Vec<SimpleLocation>,
    parts: Vec<SimpleLocation>,
}

impl FeatureGroup {
    fn new(feature_type: &str, group_id: &str, chromosome: ChromosomeId) -> Self {
        FeatureGroup {
            feature_type: feature_type.to_string(),
            group_id: group_id.to_string(),
            chromosome,
            seeds: Vec::new(),
            parts: Vec::new(),
        }
    }

    pub fn feature_type(&self) -> &str {
        &self.feature_type
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn chromosome(&self) -> ChromosomeId {
        self.chromosome
    }

    /// Locations contributed by child lines, in file order
    pub fn parts(&self) -> &[SimpleLocation] {
        &self.parts
    }

    ///
    /// Resolve the final location: the child parts if there are any (a single
    /// part stays simple, several become a composite), otherwise the feature's
    /// own location(s).
    ///
    fn into_feature(self) -> Option<Feature> {
        let locations = if self.parts.is_empty() {
            self.seeds
        } else {
            self.parts
        };

        let location = match locations.len() {
            0 => return None,
            1 => Location::Simple(locations[0]),
            _ => Location::Composite(CompositeLocation::new(locations).ok()?),
        };

        Some(Feature::new(&self.feature_type, self.chromosome, location))
    }
}

/// Returned when a line tries to join a group that lives on another chromosome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromosomeConflict {
    pub group: String,
    pub expected: ChromosomeId,
}

///
/// Accumulates [`FeatureGroup`]s keyed by `(feature type, parent or id)`.
/// Groups are finalized in the order their key was first seen.
///
#[derive(Debug, Default)]
pub struct FeatureGrouper {
    groups: Vec<FeatureGroup>,
    index: HashMap<(String, String), usize>,
}

impl FeatureGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    fn group_mut(
        &mut self,
        feature_type: &str,
        group_id: &str,
        chromosome: ChromosomeId,
    ) -> Result<&mut FeatureGroup, ChromosomeConflict> {
        let key = (feature_type.to_string(), group_id.to_string());
        let idx = match self.index.get(&key).copied() {
            Some(idx) => idx,
            None => {
                self.groups
                    .push(FeatureGroup::new(feature_type, group_id, chromosome));
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        let group = &mut self.groups[idx];
        if group.chromosome != chromosome {
            return Err(ChromosomeConflict {
                group: group_id.to_string(),
                expected: group.chromosome,
            });
        }
        Ok(group)
    }

    ///
    /// Attach a child line's location to the group `(feature_type, parent)`,
    /// creating the group if this is the first time it is referenced.
    ///
    pub fn add_part(
        &mut self,
        feature_type: &str,
        parent: &str,
        chromosome: ChromosomeId,
        location: SimpleLocation,
    ) -> Result<(), ChromosomeConflict> {
        self.group_mut(feature_type, parent, chromosome)?
            .parts
            .push(location);
        Ok(())
    }

    ///
    /// Record the location of a line that defines `(feature_type, id)` itself.
    /// If children already created the group, the seed is added to it rather
    /// than replacing it. Repeated seeds make a discontinuous feature.
    ///
    pub fn add_seed(
        &mut self,
        feature_type: &str,
        id: &str,
        chromosome: ChromosomeId,
        location: SimpleLocation,
    ) -> Result<(), ChromosomeConflict> {
        self.group_mut(feature_type, id, chromosome)?
            .seeds
            .push(location);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[FeatureGroup] {
        &self.groups
    }

    ///
    /// End of input: turn every group into its final [`Feature`]. Consumes
    /// the grouper, so no group can be extended after this point.
    ///
    pub fn finish(self, chromosomes: &ChromosomeRegistry) -> Vec<Feature> {
        self.groups
            .into_iter()
            .filter_map(|group| {
                let label = format!(
                    "{} '{}' on {}",
                    group.feature_type,
                    group.group_id,
                    chromosomes
                        .get(group.chromosome)
                        .map(|c| c.name())
                        .unwrap_or("?")
                );
                let feature = group.into_feature();
                if feature.is_none() {
                    warn!("Dropping {} which never received a location", label);
                }
                feature
            })
            .collect()
    }
}
