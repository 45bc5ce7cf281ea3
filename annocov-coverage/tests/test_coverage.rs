use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rstest::*;

use annocov_annotation::{AnnotationParser, AnnotationSet, parse_annotation};
use annocov_coverage::{BedReadReader, CoverageConfig, FeatureCoverage, OutputFormat};

#[fixture]
fn path_to_data() -> PathBuf {
    PathBuf::from("../tests/data")
}

#[fixture]
fn gff3_annotation(path_to_data: PathBuf) -> AnnotationSet {
    parse_annotation(path_to_data.join("annotation.gff3")).unwrap()
}

#[rstest]
fn test_gff3_feature_types(gff3_annotation: AnnotationSet) {
    assert_eq!(
        gff3_annotation.feature_types(),
        vec!["CDS", "gene", "mRNA", "repeat_region"]
    );

    let mrna = gff3_annotation.feature_class("mRNA").unwrap();
    let parts: Vec<usize> = mrna
        .features()
        .iter()
        .map(|f| f.location().parts().len())
        .collect();
    assert_eq!(parts, vec![3, 2]);

    // the spliced tx2 keeps its exons in file order
    let tx2 = &mrna.features()[1];
    let spans: Vec<(u32, u32)> = tx2
        .location()
        .parts()
        .iter()
        .map(|p| (p.start(), p.end()))
        .collect();
    assert_eq!(spans, vec![(500, 600), (100, 200)]);
}

#[rstest]
fn test_gff3_chromosomes(gff3_annotation: AnnotationSet) {
    let lengths: Vec<(String, u32)> = gff3_annotation
        .chromosomes()
        .iter()
        .map(|(_, c)| (c.name().to_string(), c.length()))
        .collect();
    assert_eq!(
        lengths,
        vec![("chr1".to_string(), 9000), ("chr2".to_string(), 900)]
    );
}

#[rstest]
fn test_gff3_stats(path_to_data: PathBuf) {
    let mut parser = AnnotationParser::new();
    let set = parser.parse_path(path_to_data.join("annotation.gff3")).unwrap();
    let stats = parser.stats();
    assert_eq!(stats.lines, 14);
    assert_eq!(stats.skipped_lines, 1);
    assert_eq!(stats.features, set.len());
    assert_eq!(set.len(), 5);
}

#[rstest]
fn test_gtf_feature_types(path_to_data: PathBuf) {
    let set = parse_annotation(path_to_data.join("annotation.gtf")).unwrap();
    assert_eq!(set.feature_types(), vec!["CDS", "gene", "mRNA", "transcript"]);

    let mrna = &set.feature_class("mRNA").unwrap().features()[0];
    assert_eq!(mrna.location().parts().len(), 2);
    let transcript = &set.feature_class("transcript").unwrap().features()[0];
    assert!(!transcript.location().is_composite());
}

#[rstest]
fn test_bed_reads_over_gff3(path_to_data: PathBuf, gff3_annotation: AnnotationSet) {
    let reads = BedReadReader::from_path(path_to_data.join("reads.bed")).unwrap();
    let mut coverage = FeatureCoverage::new(&gff3_annotation);
    let processed = coverage.process_reads(reads).unwrap();
    assert_eq!(processed, 8);

    let counts = coverage.finish();
    let expected: Vec<(&str, u64)> = vec![
        ("CDS", 2),
        ("gene", 4),
        ("mRNA", 4),
        ("repeat_region", 1),
    ];
    assert_eq!(counts.iter().collect::<Vec<_>>(), expected);
    assert_eq!(counts.unassigned(), 2);
    assert_eq!(counts.unknown_chromosome(), 1);
}

#[rstest]
fn test_config_driven_run(path_to_data: PathBuf) {
    let config = CoverageConfig::try_from(path_to_data.join("coverage.toml").as_path()).unwrap();
    assert_eq!(config.output_format(), OutputFormat::Json);

    let annotation = parse_annotation(path_to_data.join("annotation.gff3")).unwrap();
    let feature_types = config.feature_types.unwrap_or_default();
    let mut coverage = FeatureCoverage::with_feature_types(&annotation, &feature_types);
    coverage
        .process_reads(BedReadReader::from_path(path_to_data.join("reads.bed")).unwrap())
        .unwrap();

    let counts = coverage.finish();
    let json = serde_json::to_value(&counts).unwrap();
    assert_eq!(json["counts"]["mRNA"], 4);
    assert_eq!(json["counts"]["CDS"], 2);
    assert_eq!(json["reads"], 8);
    assert!(json["counts"].get("gene").is_none());
}
