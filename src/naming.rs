//! Chromosome naming conventions.
//!
//! Upstream files disagree on how chromosomes are spelled:
//!
//! | Source | Chromosome 1 | Chromosome X |
//! |--------|--------------|--------------|
//! | UCSC   | chr1         | chrX         |
//! | NCBI   | 1            | X            |
//!
//! Two names are *naming-equivalent* when one equals the other with the
//! [`CHROMOSOME_PREFIX`] added or removed. No other aliasing is recognized
//! (`MT` and `chrM` are different chromosomes here).
//!
//! Lookups try the name as given first and fall back to the equivalent
//! spelling only on a miss.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::BuildHasher;

/// Prefix toggled by [`alternate_name`].
pub const CHROMOSOME_PREFIX: &str = "chr";

/// Return the naming-equivalent spelling of a chromosome name.
///
/// Strips [`CHROMOSOME_PREFIX`] if present, prepends it otherwise, so the
/// function is its own inverse. Names starting with a doubled prefix
/// (`chrchr2`) are the exception: only one prefix is removed per call, so
/// they do not round-trip.
///
/// ```
/// use contigq::naming::alternate_name;
///
/// assert_eq!(alternate_name("chr1"), "1");
/// assert_eq!(alternate_name("1"), "chr1");
/// assert_eq!(alternate_name(&alternate_name("chrX")), "chrX");
/// ```
#[must_use]
pub fn alternate_name(name: &str) -> String {
    match name.strip_prefix(CHROMOSOME_PREFIX) {
        Some(stripped) => stripped.to_string(),
        None => format!("{CHROMOSOME_PREFIX}{name}"),
    }
}

/// Read-only collection keyed by chromosome name.
pub trait ContigKeys {
    /// The key stored in the collection for exactly `name`, if any.
    fn stored_key(&self, name: &str) -> Option<&str>;

    fn contains_contig(&self, name: &str) -> bool {
        self.stored_key(name).is_some()
    }
}

/// Read-only mapping from chromosome name to an entity.
pub trait ContigMap<V>: ContigKeys {
    fn get_contig(&self, name: &str) -> Option<&V>;
}

impl<V, S: BuildHasher> ContigKeys for HashMap<String, V, S> {
    fn stored_key(&self, name: &str) -> Option<&str> {
        self.get_key_value(name).map(|(k, _)| k.as_str())
    }
}

impl<V, S: BuildHasher> ContigMap<V> for HashMap<String, V, S> {
    fn get_contig(&self, name: &str) -> Option<&V> {
        self.get(name)
    }
}

impl<V> ContigKeys for BTreeMap<String, V> {
    fn stored_key(&self, name: &str) -> Option<&str> {
        self.get_key_value(name).map(|(k, _)| k.as_str())
    }
}

impl<V> ContigMap<V> for BTreeMap<String, V> {
    fn get_contig(&self, name: &str) -> Option<&V> {
        self.get(name)
    }
}

impl<S: BuildHasher> ContigKeys for HashSet<String, S> {
    fn stored_key(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl ContigKeys for BTreeSet<String> {
    fn stored_key(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Look up the entity for `name`, falling back to its naming-equivalent
/// spelling. Absence is a normal outcome and yields `None`.
pub fn resolve<'a, M, V>(map: &'a M, name: &str) -> Option<&'a V>
where
    M: ContigMap<V> + ?Sized,
{
    map.get_contig(name)
        .or_else(|| map.get_contig(&alternate_name(name)))
}

/// Check whether `name` or its naming-equivalent spelling is present.
pub fn contains<M>(map: &M, name: &str) -> bool
where
    M: ContigKeys + ?Sized,
{
    map.contains_contig(name) || map.contains_contig(&alternate_name(name))
}

/// The spelling actually stored in `map` for `name` or its equivalent.
pub fn canonical_name<'a, M>(map: &'a M, name: &str) -> Option<&'a str>
where
    M: ContigKeys + ?Sized,
{
    map.stored_key(name)
        .or_else(|| map.stored_key(&alternate_name(name)))
}
