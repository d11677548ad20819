//! Feature sources backed by indexed files, using noodles.
//!
//! # Supported Formats
//!
//! - [`TabixFeatureSource`] - bgzip-compressed VCF, BED and GFF files with a
//!   tabix (`.tbi`) index
//!
//! # Index-Based Queries
//!
//! The index translates `contig:start-end` into the file offset where the
//! overlapping records begin. Records are then read forward from there.

mod tabix;

pub use tabix::{TabixFeatureSource, TabixRecords, parse_line};
