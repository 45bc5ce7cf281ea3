//! Sources of aligned reads.
//!
//! The counting engine only needs a chromosome name and a 1-based inclusive
//! span per read, expressed through [AlignedRead]. BED-like text files are
//! always supported; BAM files are available with the `bam` feature.

use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;

use annocov_core::utils::get_dynamic_reader;

use crate::errors::{CoverageError, Result};

///
/// Anything that can be placed on the genome: a chromosome name and a
/// 1-based, inclusive span.
///
pub trait AlignedRead {
    fn chrom(&self) -> &str;
    fn start(&self) -> u32;
    fn end(&self) -> u32;
}

/// An owned read position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
}

impl ReadRecord {
    pub fn new(chrom: &str, start: u32, end: u32) -> Self {
        ReadRecord {
            chrom: chrom.to_string(),
            start,
            end,
        }
    }
}

impl AlignedRead for ReadRecord {
    fn chrom(&self) -> &str {
        &self.chrom
    }

    fn start(&self) -> u32 {
        self.start
    }

    fn end(&self) -> u32 {
        self.end
    }
}

impl<T: AlignedRead + ?Sized> AlignedRead for &T {
    fn chrom(&self) -> &str {
        (**self).chrom()
    }

    fn start(&self) -> u32 {
        (**self).start()
    }

    fn end(&self) -> u32 {
        (**self).end()
    }
}

///
/// Streams reads out of a BED-like file (`chrom start end ...`, 0-based half
/// open), converting each to 1-based inclusive coordinates. Extra columns are
/// ignored, so fragment files and bedpe-to-bed conversions work as well.
///
pub struct BedReadReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl BedReadReader<BufReader<Box<dyn Read>>> {
    /// Open a plain or gzip-compressed BED file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = get_dynamic_reader(path.as_ref())?;
        Ok(BedReadReader::new(reader))
    }
}

impl<R: BufRead> BedReadReader<R> {
    pub fn new(reader: R) -> Self {
        BedReadReader {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn parse_line(&self, line: &str) -> Result<ReadRecord> {
        let invalid = |reason: String| CoverageError::InvalidRead {
            line: self.line_no,
            reason,
        };

        let mut fields = line.split('\t');
        let chrom = fields
            .next()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| invalid("missing chromosome".to_string()))?;

        let mut coordinate = |name: &str| -> Result<u32> {
            let field = fields
                .next()
                .ok_or_else(|| invalid(format!("missing {} column", name)))?;
            field
                .trim()
                .parse::<u32>()
                .map_err(|e| invalid(format!("{} '{}': {}", name, field, e)))
        };
        let start = coordinate("start")?;
        let end = coordinate("end")?;

        if end <= start {
            return Err(invalid(format!("end {} is not after start {}", end, start)));
        }

        Ok(ReadRecord::new(chrom, start + 1, end))
    }
}

fn is_header(line: &str) -> bool {
    line.trim().is_empty()
        || line.starts_with('#')
        || line.starts_with("track")
        || line.starts_with("browser")
}

impl<R: BufRead> Iterator for BedReadReader<R> {
    type Item = Result<ReadRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            let line = line.trim_end_matches('\r');
            if is_header(line) {
                continue;
            }
            return Some(self.parse_line(line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_bed_is_converted_to_one_based() {
        let text = "track name=reads\n# comment\nchr1\t99\t200\tr1\t0\t+\n\nchr2\t0\t1\n";
        let reads: Vec<ReadRecord> = BedReadReader::new(text.as_bytes())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            reads,
            vec![ReadRecord::new("chr1", 100, 200), ReadRecord::new("chr2", 1, 1)]
        );
    }

    #[rstest]
    #[case("chr1\t10\n")]
    #[case("chr1\tten\t20\n")]
    #[case("chr1\t20\t20\n")]
    #[case("\t1\t2\n")]
    fn test_invalid_lines(#[case] text: &str) {
        let mut reader = BedReadReader::new(text.as_bytes());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, CoverageError::InvalidRead { line: 1, .. }));
        assert!(reader.next().is_none());
    }

    #[rstest]
    fn test_reading_continues_after_invalid_line() {
        let text = "chr1\tx\t5\nchr1\t4\t5\n";
        let results: Vec<Result<ReadRecord>> = BedReadReader::new(text.as_bytes()).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert_eq!(results[1].as_ref().unwrap(), &ReadRecord::new("chr1", 5, 5));
    }

    #[rstest]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.bed");
        std::fs::write(&path, "chr1\t0\t10\n").unwrap();

        let reads: Vec<ReadRecord> = BedReadReader::from_path(&path)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(reads, vec![ReadRecord::new("chr1", 1, 10)]);
    }
}
