use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;

use annocov_annotation::parse_annotation;

pub fn run_types(matches: &ArgMatches) -> Result<()> {
    let annotation_path = matches
        .get_one::<String>("annotation")
        .context("A path to an annotation file is required.")?;

    let annotation = parse_annotation(annotation_path)
        .with_context(|| format!("Failed to parse annotation {}", annotation_path))?;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    writeln!(writer, "#feature_type\tfeatures\tchromosomes")?;
    for class in annotation.feature_classes() {
        writeln!(
            writer,
            "{}\t{}\t{}",
            class.feature_type(),
            class.len(),
            class.chromosome_count()
        )?;
    }

    writeln!(writer, "#chromosome\tlength")?;
    for (_, chromosome) in annotation.chromosomes().iter() {
        writeln!(writer, "{}", chromosome)?;
    }

    writer.flush()?;
    Ok(())
}
