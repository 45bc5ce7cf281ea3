use clap::{ArgAction, Command, arg};

pub const COVERAGE_CMD: &str = "coverage";

pub fn create_coverage_cli() -> Command {
    Command::new(COVERAGE_CMD)
        .about("Count the reads overlapping each feature type of an annotation")
        .arg_required_else_help(true)
        .arg(
            arg!(-a --annotation <annotation> "GFF3 or GTF annotation file, optionally gzipped")
                .required(false),
        )
        .arg(
            arg!(-r --reads <reads> "Aligned reads: BED (0-based, optionally gzipped) or BAM")
                .required(false),
        )
        .arg(
            arg!(-c --config <config> "TOML file with default values for the other options")
                .required(false),
        )
        .arg(
            arg!(-t --"feature-type" <feature_type> "Only report this feature type (repeatable)")
                .required(false)
                .action(ArgAction::Append),
        )
        .arg(arg!(-f --format <format> "Output format: tsv (default) or json").required(false))
}
