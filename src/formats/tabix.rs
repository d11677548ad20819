use crate::features::{FeatureRecord, FeatureSource};
use crate::files::FileKind;
use noodles::bgzf;
use noodles::core::Position;
use noodles::core::region::Interval;
use noodles::csi::binning_index::BinningIndex;
use noodles::tabix;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

const COMMENT_PREFIX: char = '#';

/// Feature source over a bgzip-compressed, tabix-indexed text file.
///
/// Every query opens its own handle to the data file, so queries are
/// independent and the returned records own everything they read from.
pub struct TabixFeatureSource {
    name: String,
    path: PathBuf,
    kind: FileKind,
    index: tabix::Index,
}

impl TabixFeatureSource {
    pub fn open(path: &Path, index_path: &Path, kind: FileKind) -> io::Result<Self> {
        let index = tabix::read(index_path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            path: path.to_path_buf(),
            kind,
            index,
        })
    }

    /// Reference sequence names listed in the index, as spelled by the file.
    pub fn contig_names(&self) -> BTreeSet<String> {
        self.index
            .header()
            .map(|header| {
                header
                    .reference_sequence_names()
                    .iter()
                    .map(|name| name.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Largest position the index can address (`2^29 - 1` for tabix).
    pub fn max_position(&self) -> u64 {
        let bits = u32::from(self.index.min_shift()) + 3 * u32::from(self.index.depth());
        (1u64 << bits) - 1
    }

    fn reference_sequence_id(&self, contig: &str) -> Option<usize> {
        self.index
            .header()?
            .reference_sequence_names()
            .iter()
            .position(|name| name == contig)
    }
}

impl FeatureSource for TabixFeatureSource {
    type Feature = FeatureRecord;
    type Records = TabixRecords;

    fn query(&self, contig: &str, start: u64, end: u64) -> io::Result<TabixRecords> {
        // Unknown contigs are an empty result, like any other miss
        let Some(ref_id) = self.reference_sequence_id(contig) else {
            return Ok(TabixRecords::empty());
        };
        let max = self.max_position();
        if end < start || end == 0 || start > max {
            return Ok(TabixRecords::empty());
        }

        // The index rejects bounds past its addressable range; nothing lives there
        let interval = Interval::from(to_position(start.max(1))?..=to_position(end.min(max))?);
        let chunks = self.index.query(ref_id, interval)?;

        let Some(first) = chunks.iter().map(|chunk| chunk.start()).min() else {
            return Ok(TabixRecords::empty());
        };

        let mut reader = bgzf::Reader::new(File::open(&self.path)?);
        reader.seek(first)?;

        Ok(TabixRecords {
            reader: Some(reader),
            kind: self.kind,
            contig: contig.to_string(),
            start,
            end,
            line: String::new(),
            in_contig: false,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn to_position(n: u64) -> io::Result<Position> {
    usize::try_from(n)
        .ok()
        .and_then(|n| Position::try_from(n).ok())
        .ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid position: {n}"))
        })
}

/// Lazy records of one tabix query.
///
/// Reads forward from the first index chunk and stops at the first record
/// past the interval or on another contig. The file handle is dropped as soon
/// as the records are exhausted or an error is hit.
pub struct TabixRecords {
    reader: Option<bgzf::Reader<File>>,
    kind: FileKind,
    contig: String,
    start: u64,
    end: u64,
    line: String,
    in_contig: bool,
}

impl TabixRecords {
    fn empty() -> Self {
        Self {
            reader: None,
            kind: FileKind::default(),
            contig: String::new(),
            start: 0,
            end: 0,
            line: String::new(),
            in_contig: false,
        }
    }
}

impl Iterator for TabixRecords {
    type Item = io::Result<FeatureRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;

        let result = loop {
            self.line.clear();
            match reader.read_line(&mut self.line) {
                Ok(0) => break None,
                Ok(_) => {}
                Err(e) => break Some(Err(e)),
            }

            let line = self.line.trim_end_matches(['\n', '\r']);
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }

            let record = match parse_line(line, self.kind) {
                Ok(record) => record,
                Err(e) => break Some(Err(e)),
            };

            if record.contig != self.contig {
                if self.in_contig {
                    break None;
                }
                continue;
            }
            self.in_contig = true;

            if record.start > self.end {
                break None;
            }
            if record.end < self.start {
                continue;
            }
            break Some(Ok(record));
        };

        if !matches!(result, Some(Ok(_))) {
            self.reader = None;
        }
        result
    }
}

/// Pull contig, 1-based start and inclusive end out of a tab-separated line.
pub fn parse_line(line: &str, kind: FileKind) -> io::Result<FeatureRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    let field = |i: usize| {
        fields.get(i).copied().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("missing column {} in line: {line}", i + 1),
            )
        })
    };
    let number = |i: usize| -> io::Result<u64> {
        let value = field(i)?;
        value.parse().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid position in column {}: {value}", i + 1),
            )
        })
    };

    let contig = field(0)?;
    let (start, end) = match kind {
        FileKind::Vcf => {
            let pos = number(1)?;
            let reference_len = field(3)?.len().max(1) as u64;
            let end = pos.checked_add(reference_len - 1).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("position out of range: {pos}"),
                )
            })?;
            (pos, end)
        }
        // 0-based half-open
        FileKind::Bed => (number(1)? + 1, number(2)?),
        FileKind::Gff => (number(3)?, number(4)?),
    };

    Ok(FeatureRecord {
        contig: contig.to_string(),
        start,
        end,
        line: Some(line.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;
    use crate::query::tolerant_query;

    #[test]
    fn test_parse_vcf_line() {
        let record = parse_line("chr1\t100\trs1\tACG\tA\t50\tPASS\t.", FileKind::Vcf).unwrap();
        assert_eq!(record.contig(), "chr1");
        assert_eq!(record.start(), 100);
        assert_eq!(record.end(), 102);
        assert!(record.line.as_deref().unwrap().starts_with("chr1\t100"));
    }

    #[test]
    fn test_parse_bed_line() {
        let record = parse_line("1\t0\t10\tgene_a", FileKind::Bed).unwrap();
        assert_eq!(record.start, 1);
        assert_eq!(record.end, 10);
    }

    #[test]
    fn test_parse_gff_line() {
        let line = "chrX\tsrc\tgene\t2000\t2500\t.\t+\t.\tID=g1";
        let record = parse_line(line, FileKind::Gff).unwrap();
        assert_eq!(record.contig, "chrX");
        assert_eq!((record.start, record.end), (2000, 2500));
    }

    #[test]
    fn test_parse_malformed_lines() {
        let err = parse_line("chr1", FileKind::Bed).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err = parse_line("chr1\tabc\t10", FileKind::Bed).unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_empty_records() {
        assert!(TabixRecords::empty().next().is_none());
    }

    #[test]
    fn test_parse_vcf_position_overflow() {
        let err = parse_line("chr1\t18446744073709551615\t.\tAC\tA", FileKind::Vcf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    const CALLS: &[&str] = &[
        "chr1\t100\t.\tA\tG\t.\tPASS\t.",
        "chr1\t150\t.\tAC\tA\t.\tPASS\t.",
        "chr1\t400\t.\tA\tT\t.\tPASS\t.",
        "chr2\t120\t.\tG\tC\t.\tPASS\t.",
    ];

    /// Write `lines` as a bgzipped VCF next to a tabix index built on the fly.
    fn write_indexed_vcf(dir: &Path, lines: &[&str]) -> (PathBuf, PathBuf) {
        use noodles::csi::binning_index::index::reference_sequence::bin::Chunk;
        use std::io::Write;

        let path = dir.join("calls.vcf.gz");
        let index_path = dir.join("calls.vcf.gz.tbi");

        let mut writer = bgzf::Writer::new(File::create(&path).unwrap());
        let mut indexer = tabix::index::Indexer::default();
        writer.write_all(b"##fileformat=VCFv4.3\n").unwrap();

        for line in lines {
            let record = parse_line(line, FileKind::Vcf).unwrap();
            let chunk_start = writer.virtual_position();
            writer.write_all(line.as_bytes()).unwrap();
            writer.write_all(b"\n").unwrap();
            let chunk_end = writer.virtual_position();

            indexer
                .add_record(
                    &record.contig,
                    Position::try_from(record.start as usize).unwrap(),
                    Position::try_from(record.end as usize).unwrap(),
                    Chunk::new(chunk_start, chunk_end),
                )
                .unwrap();
        }

        writer.finish().unwrap();
        tabix::write(&index_path, &indexer.build()).unwrap();
        (path, index_path)
    }

    fn open_calls(dir: &Path) -> TabixFeatureSource {
        let (path, index_path) = write_indexed_vcf(dir, CALLS);
        TabixFeatureSource::open(&path, &index_path, FileKind::Vcf).unwrap()
    }

    fn starts(records: impl Iterator<Item = io::Result<FeatureRecord>>) -> Vec<u64> {
        records.map(|r| r.unwrap().start).collect()
    }

    #[test]
    fn test_tabix_source_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let source = open_calls(dir.path());

        assert_eq!(source.name(), "calls.vcf.gz");
        assert_eq!(source.max_position(), (1 << 29) - 1);
        let names: Vec<_> = source.contig_names().into_iter().collect();
        assert_eq!(names, vec!["chr1", "chr2"]);
    }

    #[test]
    fn test_tabix_query_closed_interval() {
        let dir = tempfile::tempdir().unwrap();
        let source = open_calls(dir.path());

        assert_eq!(starts(source.query("chr1", 100, 150).unwrap()), vec![100, 150]);
        assert_eq!(starts(source.query("chr1", 101, 149).unwrap()), Vec::<u64>::new());
        // The deletion at 150 spans 150-151
        assert_eq!(starts(source.query("chr1", 151, 151).unwrap()), vec![150]);
        assert_eq!(starts(source.query("chr1", 400, 400).unwrap()), vec![400]);
    }

    #[test]
    fn test_tabix_query_stops_at_contig_change() {
        let dir = tempfile::tempdir().unwrap();
        let source = open_calls(dir.path());

        assert_eq!(starts(source.query("chr1", 1, 1_000).unwrap()), vec![100, 150, 400]);
        let chr2: Vec<_> = source.query("chr2", 1, 1_000).unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(chr2.len(), 1);
        assert_eq!(chr2[0].contig, "chr2");
        assert_eq!(chr2[0].start, 120);
    }

    #[test]
    fn test_tabix_query_open_ended() {
        let dir = tempfile::tempdir().unwrap();
        let source = open_calls(dir.path());

        let all = u32::MAX as u64;
        assert_eq!(starts(source.query("chr1", 1, all).unwrap()), vec![100, 150, 400]);
        assert_eq!(starts(source.query("chr1", 200, u64::MAX).unwrap()), vec![400]);
        // Past the addressable range there is nothing to find
        assert_eq!(source.query("chr1", 1 << 30, u64::MAX).unwrap().count(), 0);
    }

    #[test]
    fn test_tabix_unknown_contig_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = open_calls(dir.path());

        assert_eq!(source.query("chr3", 1, 1_000).unwrap().count(), 0);
        assert_eq!(source.query("1", 1, 1_000).unwrap().count(), 0);
    }

    #[test]
    fn test_tabix_tolerant_query_with_alternate_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = open_calls(dir.path());

        let cursor = tolerant_query(&source, "1", 1, u32::MAX as u64).unwrap();
        assert_eq!(cursor.queried_name(), "chr1");
        assert_eq!(starts(cursor), vec![100, 150, 400]);

        let cursor = tolerant_query(&source, "chr2", 100, 200).unwrap();
        assert_eq!(cursor.queried_name(), "chr2");
        assert_eq!(starts(cursor), vec![120]);

        let mut cursor = tolerant_query(&source, "2", 500, 600).unwrap();
        assert!(!cursor.has_next());
        assert_eq!(cursor.queried_name(), "chr2");
    }
}
