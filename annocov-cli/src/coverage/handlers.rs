use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};

use annocov_annotation::parse_annotation;
use annocov_coverage::{
    BedReadReader, CoverageConfig, FeatureCounts, FeatureCoverage, OutputFormat,
};

pub fn run_coverage(matches: &ArgMatches) -> Result<()> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => CoverageConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load config file {}", path))?,
        None => CoverageConfig::default(),
    };

    let annotation_path = matches
        .get_one::<String>("annotation")
        .map(PathBuf::from)
        .or(config.annotation.clone())
        .context("An annotation file is required (-a or `annotation` in the config)")?;

    let reads_path = matches
        .get_one::<String>("reads")
        .map(PathBuf::from)
        .or(config.reads.clone())
        .context("A reads file is required (-r or `reads` in the config)")?;

    let feature_types: Option<Vec<String>> = matches
        .get_many::<String>("feature-type")
        .map(|types| types.cloned().collect())
        .or(config.feature_types.clone());

    let format = match matches.get_one::<String>("format") {
        Some(format) => format.parse::<OutputFormat>()?,
        None => config.output_format(),
    };

    let annotation = parse_annotation(&annotation_path)
        .with_context(|| format!("Failed to parse annotation {}", annotation_path.display()))?;

    let mut coverage = match &feature_types {
        Some(types) => FeatureCoverage::with_feature_types(&annotation, types),
        None => FeatureCoverage::new(&annotation),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {human_pos} reads ({per_sec}) {msg}",
    )?);
    pb.enable_steady_tick(Duration::from_millis(120));

    count_reads(&mut coverage, &reads_path, &pb)
        .with_context(|| format!("Failed to count reads from {}", reads_path.display()))?;
    pb.finish_with_message("done");

    write_counts(&coverage.finish(), format)
}

fn count_reads(coverage: &mut FeatureCoverage, path: &Path, pb: &ProgressBar) -> Result<u64> {
    if path.extension().is_some_and(|ext| ext == "bam") {
        return count_bam(coverage, path, pb);
    }
    let reads = BedReadReader::from_path(path)?;
    Ok(coverage.process_reads(reads.progress_with(pb.clone()))?)
}

#[cfg(feature = "bam")]
fn count_bam(coverage: &mut FeatureCoverage, path: &Path, pb: &ProgressBar) -> Result<u64> {
    let mut reads = annocov_coverage::open_bam(path)?;
    let processed = coverage.process_reads(reads.by_ref().progress_with(pb.clone()))?;
    log::info!("Skipped {} unmapped records", reads.unmapped());
    Ok(processed)
}

#[cfg(not(feature = "bam"))]
fn count_bam(_coverage: &mut FeatureCoverage, path: &Path, _pb: &ProgressBar) -> Result<u64> {
    anyhow::bail!(
        "{} is a BAM file, rebuild annocov with the `bam` feature to read it",
        path.display()
    )
}

fn write_counts(counts: &FeatureCounts, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    match format {
        OutputFormat::Tsv => {
            for (feature_type, reads) in counts.iter() {
                writeln!(writer, "{}\t{}", feature_type, reads)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, counts)?;
            writeln!(writer)?;
        }
    }

    writer.flush()?;
    Ok(())
}
