use clap::{Command, arg};

pub const TYPES_CMD: &str = "types";

pub fn create_types_cli() -> Command {
    Command::new(TYPES_CMD)
        .about("List the feature types and chromosomes found in an annotation")
        .arg_required_else_help(true)
        .arg(
            arg!(-a --annotation <annotation> "GFF3 or GTF annotation file, optionally gzipped")
                .required(true),
        )
}
