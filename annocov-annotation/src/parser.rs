use std::io::BufRead;
use std::path::Path;

use log::{debug, info, warn};

use annocov_core::models::{ChromosomeId, Feature, Location, SimpleLocation, Strand};
use annocov_core::utils::get_dynamic_reader;

use crate::annotation_set::{AnnotationSet, AnnotationSetBuilder};
use crate::attributes::{Attributes, ID, PARENT, TRANSCRIPT_ID};
use crate::errors::{AnnotationError, FormatError, Result};
use crate::grouping::FeatureGrouper;

/// Number of recoverable problems logged individually before the parser goes quiet
pub const MAX_LOGGED_WARNINGS: usize = 50;
/// A debug progress message is emitted every this many lines
pub const PROGRESS_INTERVAL: usize = 100_000;

/// Feature type every exon of a grouped transcript is folded into
const TRANSCRIPT_TYPE: &str = "mRNA";
const EXON_TYPE: &str = "exon";

const MIN_COLUMNS: usize = 5;

///
/// Counters collected while parsing one file.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// every line of the file, comments included
    pub lines: usize,
    /// lines dropped because of a missing column or a bad coordinate
    pub skipped_lines: usize,
    /// attribute tokens matching neither GFF3 nor GTF
    pub malformed_attributes: usize,
    /// parts refused because they pointed at a group on another chromosome
    pub rejected_parts: usize,
    /// number of distinct groups built from Parent/transcript_id/ID lines
    pub groups: usize,
    /// features in the final set
    pub features: usize,
}

impl ParseStats {
    pub fn warnings(&self) -> usize {
        self.skipped_lines + self.malformed_attributes + self.rejected_parts
    }
}

///
/// Line-oriented GFF3/GTF reader producing an [AnnotationSet].
///
/// Parsing is two-phase: lines are accumulated into a [FeatureGrouper] while
/// the file streams past, and groups are only resolved once the last line has
/// been read, since a child may precede the line defining its parent.
///
/// Malformed lines are logged and skipped; only I/O failures abort.
///
#[derive(Debug)]
pub struct AnnotationParser {
    max_logged_warnings: usize,
    stats: ParseStats,
}

impl Default for AnnotationParser {
    fn default() -> Self {
        AnnotationParser {
            max_logged_warnings: MAX_LOGGED_WARNINGS,
            stats: ParseStats::default(),
        }
    }
}

impl AnnotationParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log at most `max` recoverable problems, then a single suppression notice
    pub fn with_max_logged_warnings(mut self, max: usize) -> Self {
        self.max_logged_warnings = max;
        self
    }

    /// Statistics of the last parse
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    ///
    /// Parse an annotation file, plain or gzip-compressed.
    ///
    /// # Arguments
    /// - path: path to a `.gff`, `.gff3`, `.gtf` file, optionally ending in `.gz`
    pub fn parse_path<P: AsRef<Path>>(&mut self, path: P) -> Result<AnnotationSet> {
        let path = path.as_ref();
        info!("Reading annotation from {}", path.display());
        let reader = get_dynamic_reader(path)?;
        self.parse_reader(reader)
    }

    ///
    /// Parse annotation lines from any buffered reader.
    ///
    pub fn parse_reader<R: BufRead>(&mut self, reader: R) -> Result<AnnotationSet> {
        self.stats = ParseStats::default();

        let mut builder = AnnotationSetBuilder::new();
        let mut grouper = FeatureGrouper::new();

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|source| AnnotationError::Read {
                line: line_no,
                source,
            })?;
            self.stats.lines = line_no;

            if line_no % PROGRESS_INTERVAL == 0 {
                debug!(
                    "Read {} annotation lines, {} groups open",
                    line_no,
                    grouper.len()
                );
            }

            self.parse_line(line_no, &line, &mut builder, &mut grouper);
        }

        self.stats.groups = grouper.len();
        for feature in grouper.finish(builder.chromosomes()) {
            builder.add_feature(feature);
        }

        let set = builder.build();
        self.stats.features = set.len();

        if self.stats.warnings() > self.max_logged_warnings {
            warn!(
                "{} annotation warnings in total, only the first {} were logged",
                self.stats.warnings(),
                self.max_logged_warnings
            );
        }
        info!(
            "Parsed {} features of {} types on {} chromosomes from {} lines ({} skipped)",
            set.len(),
            set.feature_types().len(),
            set.chromosomes().len(),
            self.stats.lines,
            self.stats.skipped_lines
        );

        Ok(set)
    }

    fn parse_line(
        &mut self,
        line_no: usize,
        line: &str,
        builder: &mut AnnotationSetBuilder,
        grouper: &mut FeatureGrouper,
    ) {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            return;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_COLUMNS {
            self.report(FormatError::MissingColumns {
                line: line_no,
                found: fields.len(),
            });
            return;
        }

        let strand = Strand::from_column(fields.get(6).copied());
        let location = match SimpleLocation::parse(fields[3], fields[4], strand) {
            Ok(location) => location,
            Err(source) => {
                self.report(FormatError::InvalidLocation {
                    line: line_no,
                    source,
                });
                return;
            }
        };

        let chromosome = builder.chromosome_id(fields[0]);
        let feature_type = fields[2];

        let attributes = match fields.get(8).filter(|column| !column.trim().is_empty()) {
            Some(column) => {
                let (attributes, malformed) = Attributes::parse(column);
                for token in malformed {
                    self.report(FormatError::MalformedAttribute {
                        line: line_no,
                        token,
                    });
                }
                attributes
            }
            None => Attributes::default(),
        };

        if attributes.contains(PARENT) && feature_type != TRANSCRIPT_TYPE {
            let parents = attributes.parents();
            if parents.is_empty() {
                self.report(FormatError::EmptyParent { line: line_no });
                return;
            }
            let group_type = transcript_type(feature_type);
            for parent in parents {
                self.add_part(
                    line_no, builder, grouper, group_type, parent, chromosome, location,
                );
            }
        } else if let Some(transcript) = attributes.first(TRANSCRIPT_ID) {
            let group_type = transcript_type(feature_type);
            self.add_part(
                line_no, builder, grouper, group_type, transcript, chromosome, location,
            );
        } else if let Some(id) = attributes.first(ID) {
            // the line's own extent counts even if child parts replace it later
            if let Err(conflict) = grouper.add_seed(feature_type, id, chromosome, location) {
                self.report(mismatch(
                    line_no,
                    builder,
                    feature_type,
                    &conflict.group,
                    conflict.expected,
                    chromosome,
                ));
            } else {
                builder.grow_chromosome(chromosome, location.end());
            }
        } else {
            builder.add_feature(Feature::new(
                feature_type,
                chromosome,
                Location::Simple(location),
            ));
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_part(
        &mut self,
        line_no: usize,
        builder: &AnnotationSetBuilder,
        grouper: &mut FeatureGrouper,
        group_type: &str,
        group_id: &str,
        chromosome: ChromosomeId,
        location: SimpleLocation,
    ) {
        if let Err(conflict) = grouper.add_part(group_type, group_id, chromosome, location) {
            self.report(mismatch(
                line_no,
                builder,
                group_type,
                &conflict.group,
                conflict.expected,
                chromosome,
            ));
        }
    }

    fn report(&mut self, error: FormatError) {
        match &error {
            FormatError::MissingColumns { .. }
            | FormatError::InvalidLocation { .. }
            | FormatError::EmptyParent { .. } => self.stats.skipped_lines += 1,
            FormatError::MalformedAttribute { .. } => self.stats.malformed_attributes += 1,
            FormatError::ChromosomeMismatch { .. } => self.stats.rejected_parts += 1,
        }

        let count = self.stats.warnings();
        if count <= self.max_logged_warnings {
            if error.skips_line() {
                warn!("Skipping annotation line. {}", error);
            } else {
                warn!("{}", error);
            }
        }
        if count == self.max_logged_warnings {
            warn!("Further annotation warnings are suppressed");
        }
    }
}

/// Exons grouped under a parent become one spliced transcript
fn transcript_type(feature_type: &str) -> &str {
    if feature_type == EXON_TYPE {
        TRANSCRIPT_TYPE
    } else {
        feature_type
    }
}

fn mismatch(
    line: usize,
    builder: &AnnotationSetBuilder,
    feature_type: &str,
    group: &str,
    expected: ChromosomeId,
    found: ChromosomeId,
) -> FormatError {
    let name = |id| {
        builder
            .chromosomes()
            .get(id)
            .map(|c| c.name().to_string())
            .unwrap_or_default()
    };
    FormatError::ChromosomeMismatch {
        line,
        feature_type: feature_type.to_string(),
        group: group.to_string(),
        expected: name(expected),
        found: name(found),
    }
}

///
/// Parse an annotation file with default settings.
///
pub fn parse_annotation<P: AsRef<Path>>(path: P) -> Result<AnnotationSet> {
    AnnotationParser::new().parse_path(path)
}
