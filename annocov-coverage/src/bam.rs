use std::io::Read;
use std::path::Path;

use noodles::bam;
use noodles::sam;
use noodles::sam::alignment::Record as SamRecord;

use crate::errors::{CoverageError, Result};
use crate::reads::ReadRecord;

///
/// Streams mapped reads out of a BAM file. Unmapped records are skipped;
/// every other record becomes a [ReadRecord] spanning its alignment.
///
pub struct BamReadReader<R> {
    reader: bam::io::Reader<R>,
    header: sam::Header,
    record: bam::Record,
    records_read: usize,
    unmapped: usize,
}

///
/// Open a BAM file and read its header.
///
pub fn open_bam<P: AsRef<Path>>(path: P) -> Result<BamReadReader<impl Read>> {
    let mut reader = bam::io::reader::Builder::default().build_from_path(path)?;
    let header = reader.read_header()?;
    Ok(BamReadReader::new(reader, header))
}

impl<R: Read> BamReadReader<R> {
    pub fn new(reader: bam::io::Reader<R>, header: sam::Header) -> Self {
        BamReadReader {
            reader,
            header,
            record: bam::Record::default(),
            records_read: 0,
            unmapped: 0,
        }
    }

    /// Number of unmapped records skipped so far
    pub fn unmapped(&self) -> usize {
        self.unmapped
    }

    fn to_read(&self) -> Result<ReadRecord> {
        let record = &self.record;
        let missing = |field| CoverageError::IncompleteAlignment {
            record: self.records_read,
            field,
        };

        let id = record
            .reference_sequence_id()
            .ok_or_else(|| missing("reference sequence"))??;
        let (name, _) = self
            .header
            .reference_sequences()
            .get_index(id)
            .ok_or(CoverageError::UnknownReference(id))?;

        let start = record
            .alignment_start()
            .ok_or_else(|| missing("alignment start"))??;
        let end = SamRecord::alignment_end(record).ok_or_else(|| missing("alignment end"))??;

        let coordinate =
            |position: usize, field| u32::try_from(position).map_err(|_| missing(field));
        Ok(ReadRecord::new(
            &name.to_string(),
            coordinate(start.get(), "alignment start")?,
            coordinate(end.get(), "alignment end")?,
        ))
    }
}

impl<R: Read> Iterator for BamReadReader<R> {
    type Item = Result<ReadRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.records_read += 1;

            if self.record.flags().is_unmapped() {
                self.unmapped += 1;
                continue;
            }
            return Some(self.to_read());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::num::NonZeroUsize;

    use noodles::core::Position;
    use noodles::sam::alignment::RecordBuf;
    use noodles::sam::alignment::io::Write as _;
    use noodles::sam::alignment::record::Flags;
    use noodles::sam::alignment::record::cigar::{Op, op::Kind};
    use noodles::sam::header::record::value::{Map, map::ReferenceSequence};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn write_bam(path: &Path) {
        let header = sam::Header::builder()
            .add_reference_sequence(
                "chr1",
                Map::<ReferenceSequence>::new(NonZeroUsize::try_from(10_000).unwrap()),
            )
            .add_reference_sequence(
                "chr2",
                Map::<ReferenceSequence>::new(NonZeroUsize::try_from(5_000).unwrap()),
            )
            .build();

        let mapped = RecordBuf::builder()
            .set_flags(Flags::empty())
            .set_reference_sequence_id(1)
            .set_alignment_start(Position::try_from(100).unwrap())
            .set_cigar([Op::new(Kind::Match, 50)].into_iter().collect())
            .build();
        let unmapped = RecordBuf::builder().set_flags(Flags::UNMAPPED).build();

        let mut writer = bam::io::Writer::new(File::create(path).unwrap());
        writer.write_header(&header).unwrap();
        writer.write_alignment_record(&header, &mapped).unwrap();
        writer.write_alignment_record(&header, &unmapped).unwrap();
        writer.try_finish().unwrap();
    }

    #[rstest]
    fn test_mapped_reads_are_one_based_and_unmapped_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.bam");
        write_bam(&path);

        let mut reader = open_bam(&path).unwrap();
        let reads: Vec<ReadRecord> = reader.by_ref().collect::<Result<_>>().unwrap();

        assert_eq!(reads, vec![ReadRecord::new("chr2", 100, 149)]);
        assert_eq!(reader.unmapped(), 1);
    }

    #[rstest]
    fn test_missing_bam_is_io_error() {
        let result = open_bam("/no/such/reads.bam");
        assert!(matches!(result, Err(CoverageError::Io(_))));
    }
}
