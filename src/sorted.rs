//! Sort-order validation for feature streams.
//!
//! Features must be ordered by start position within each contig's run.
//! Moving to a different contig never counts as a violation.

use crate::features::Feature;
use crate::{Error, Result};
use serde::Serialize;
use std::io;

/// A record whose start lies before the start of the record preceding it on
/// the same contig.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error(
    "Input file is not sorted by start position. We saw a record with a start of \
     {contig}:{start} after a record with a start of {previous_contig}:{previous_start} \
     (file: {file})"
)]
pub struct UnsortedInput {
    pub file: String,
    pub previous_contig: String,
    pub previous_start: u64,
    pub contig: String,
    pub start: u64,
}

/// Check that `feature` may follow `last` in a file sorted by start position.
pub fn check_sorted<F, L>(feature: &F, last: &L, file: &str) -> std::result::Result<(), UnsortedInput>
where
    F: Feature + ?Sized,
    L: Feature + ?Sized,
{
    if feature.start() < last.start() && feature.contig() == last.contig() {
        return Err(UnsortedInput {
            file: file.to_string(),
            previous_contig: last.contig().to_string(),
            previous_start: last.start(),
            contig: feature.contig().to_string(),
            start: feature.start(),
        });
    }
    Ok(())
}

/// Tracks the last seen `(contig, start)` of one stream.
#[derive(Debug, Clone)]
pub struct SortedStreamGuard {
    file: String,
    last: Option<(String, u64)>,
}

impl SortedStreamGuard {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            last: None,
        }
    }

    /// Validate the next feature of the stream and remember it.
    ///
    /// On a violation the guard keeps the previous reference record.
    pub fn check<F>(&mut self, feature: &F) -> std::result::Result<(), UnsortedInput>
    where
        F: Feature + ?Sized,
    {
        if let Some((contig, start)) = &mut self.last {
            if feature.contig() == contig.as_str() {
                if feature.start() < *start {
                    return Err(UnsortedInput {
                        file: self.file.clone(),
                        previous_contig: contig.clone(),
                        previous_start: *start,
                        contig: feature.contig().to_string(),
                        start: feature.start(),
                    });
                }
                *start = feature.start();
                return Ok(());
            }
        }

        self.last = Some((feature.contig().to_string(), feature.start()));
        Ok(())
    }

    pub fn file(&self) -> &str {
        &self.file
    }
}

/// Iterator adapter that validates sort order while records are consumed.
///
/// Yields records until the first I/O error or sort violation, yields that
/// error, then stops.
pub struct Sorted<I> {
    records: I,
    guard: SortedStreamGuard,
    done: bool,
}

impl<I, F> Iterator for Sorted<I>
where
    I: Iterator<Item = io::Result<F>>,
    F: Feature,
{
    type Item = Result<F>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = match self.records.next()? {
            Ok(feature) => self
                .guard
                .check(&feature)
                .map(|()| feature)
                .map_err(Error::from),
            Err(e) => Err(Error::Io(e)),
        };

        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

pub trait SortedExt: Sized {
    /// Validate sort order while iterating; `file` identifies the stream in
    /// violations.
    fn check_sorted(self, file: impl Into<String>) -> Sorted<Self>;
}

impl<I, F> SortedExt for I
where
    I: Iterator<Item = io::Result<F>>,
    F: Feature,
{
    fn check_sorted(self, file: impl Into<String>) -> Sorted<Self> {
        Sorted {
            records: self,
            guard: SortedStreamGuard::new(file),
            done: false,
        }
    }
}
