mod coverage;
mod types;

use anyhow::Result;
use clap::{ArgAction, Command, arg};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "annocov";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Count how sequencing reads distribute over the feature types of a GFF3/GTF annotation.")
        .subcommand_required(true)
        .arg(
            arg!(-v --verbose "Log debug messages")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(coverage::cli::create_coverage_cli())
        .subcommand(types::cli::create_types_cli())
}

/// `info` by default, `debug` with --verbose; RUST_LOG has the last word
fn init_logger(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logger(matches.get_flag("verbose"));

    match matches.subcommand() {
        //
        // COVERAGE
        //
        Some((coverage::cli::COVERAGE_CMD, matches)) => {
            coverage::handlers::run_coverage(matches)?;
        }

        //
        // TYPES
        //
        Some((types::cli::TYPES_CMD, matches)) => {
            types::handlers::run_types(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn test_cli_is_valid() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_repeated_feature_types() {
        let matches = build_parser()
            .try_get_matches_from([
                "annocov", "coverage", "-a", "a.gff3", "-r", "r.bed", "-t", "mRNA", "-t", "CDS",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let types: Vec<&String> = sub.get_many::<String>("feature-type").unwrap().collect();
        assert_eq!(types, vec!["mRNA", "CDS"]);
    }

    #[rstest]
    fn test_verbose_is_global() {
        let matches = build_parser()
            .try_get_matches_from(["annocov", "types", "-a", "a.gtf", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }
}
