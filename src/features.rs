//! Feature records and the sources that produce them.

use serde::Serialize;
use std::io;

/// A single annotated genomic record.
pub trait Feature {
    fn contig(&self) -> &str;

    /// 1-based start position.
    fn start(&self) -> u64;

    /// 1-based inclusive end position.
    fn end(&self) -> u64;
}

/// An indexed file that can be queried for features overlapping an interval.
///
/// `Records` owns whatever it reads from (file handles, buffers), so dropping
/// it releases the underlying resources. Sources are queried through `&self`;
/// each call yields an independent, single-consumer sequence.
pub trait FeatureSource {
    type Feature: Feature;
    type Records: Iterator<Item = io::Result<Self::Feature>>;

    /// Query features on `contig` overlapping `[start, end]`.
    ///
    /// An unknown contig is not an error; it yields an empty sequence.
    fn query(&self, contig: &str, start: u64, end: u64) -> io::Result<Self::Records>;

    /// Identity of the underlying file, used in diagnostics.
    fn name(&self) -> &str;
}

/// A plain feature record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureRecord {
    pub contig: String,
    pub start: u64,
    pub end: u64,
    /// The raw line the record was read from, when read from a text file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
}

impl FeatureRecord {
    pub fn new(contig: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            contig: contig.into(),
            start,
            end,
            line: None,
        }
    }

    pub fn overlaps(&self, start: u64, end: u64) -> bool {
        self.start <= end && self.end >= start
    }
}

impl Feature for FeatureRecord {
    fn contig(&self) -> &str {
        &self.contig
    }

    fn start(&self) -> u64 {
        self.start
    }

    fn end(&self) -> u64 {
        self.end
    }
}

/// In-memory feature source, records kept in file order.
#[derive(Debug, Clone, Default)]
pub struct MemoryFeatureSource {
    name: String,
    records: Vec<FeatureRecord>,
}

impl MemoryFeatureSource {
    pub fn new(name: impl Into<String>, records: Vec<FeatureRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

impl FeatureSource for MemoryFeatureSource {
    type Feature = FeatureRecord;
    type Records = std::vec::IntoIter<io::Result<FeatureRecord>>;

    fn query(&self, contig: &str, start: u64, end: u64) -> io::Result<Self::Records> {
        let hits: Vec<_> = self
            .records
            .iter()
            .filter(|r| r.contig == contig && r.overlaps(start, end))
            .cloned()
            .map(Ok)
            .collect();
        Ok(hits.into_iter())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
