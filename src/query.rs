//! Naming-tolerant feature queries.
//!
//! A query issued with the wrong chromosome naming convention does not fail,
//! it just comes back empty. [`tolerant_query`] retries such a query exactly
//! once with the [`alternate_name`] of the chromosome.
//!
//! A chromosome that genuinely has no features in the interval looks the same
//! as a naming miss: both attempts come back empty and the caller gets an
//! empty cursor. Nothing here tries to tell the two apart.

use crate::features::FeatureSource;
use crate::naming::alternate_name;
use std::io;
use std::iter::Peekable;

/// Lazy, forward-only cursor over the result of a feature query.
///
/// Single-consumer. The underlying records (and any file handle they hold) are
/// released when the cursor is dropped or [`closed`](FeatureCursor::close).
pub struct FeatureCursor<I: Iterator> {
    records: Peekable<I>,
    queried_name: String,
}

impl<I: Iterator> FeatureCursor<I> {
    pub fn new(records: I, queried_name: impl Into<String>) -> Self {
        Self {
            records: records.peekable(),
            queried_name: queried_name.into(),
        }
    }

    /// Check for a next item without consuming it.
    pub fn has_next(&mut self) -> bool {
        self.records.peek().is_some()
    }

    /// The chromosome name this cursor's query was issued with.
    pub fn queried_name(&self) -> &str {
        &self.queried_name
    }

    /// Release the cursor and its underlying resources.
    pub fn close(self) {
        drop(self);
    }
}

impl<I: Iterator> Iterator for FeatureCursor<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next()
    }
}

/// Query `source` for `[start, end]` on chromosome `name`, retrying once with
/// the naming-equivalent spelling if the first result is empty.
///
/// I/O errors from either query are returned as-is and never retried. A first
/// record that is itself an error counts as a non-empty result; the error
/// surfaces when the cursor is consumed.
pub fn tolerant_query<S>(
    source: &S,
    name: &str,
    start: u64,
    end: u64,
) -> io::Result<FeatureCursor<S::Records>>
where
    S: FeatureSource + ?Sized,
{
    let mut cursor = FeatureCursor::new(source.query(name, start, end)?, name);
    if cursor.has_next() {
        return Ok(cursor);
    }
    cursor.close();

    let alternate = alternate_name(name);
    tracing::debug!(
        source = source.name(),
        name,
        alternate = %alternate,
        start,
        end,
        "empty result, retrying with alternate chromosome name"
    );

    let records = source.query(&alternate, start, end)?;
    Ok(FeatureCursor::new(records, alternate))
}
