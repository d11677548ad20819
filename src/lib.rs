//! # contigq
//!
//! Chromosome-name tolerant queries over indexed genomic feature files.
//!
//! Feature files disagree on how chromosomes are named (`1` vs `chr1`), and a
//! query issued with the wrong spelling silently comes back empty. This crate
//! retries such lookups with the naming-equivalent spelling, derives
//! content-addressed cache paths for remote downloads, and validates that
//! feature streams are sorted.
//!
//! ## Example
//!
//! ```
//! use contigq::features::{FeatureRecord, MemoryFeatureSource};
//! use contigq::query::tolerant_query;
//!
//! let source = MemoryFeatureSource::new(
//!     "calls.vcf.gz",
//!     vec![FeatureRecord::new("chr1", 100, 100)],
//! );
//!
//! let cursor = tolerant_query(&source, "1", 1, 1_000).unwrap();
//! assert_eq!(cursor.queried_name(), "chr1");
//! assert_eq!(cursor.count(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`naming`]: naming-equivalent chromosome names and lookups
//! - [`query`]: naming-tolerant feature queries
//! - [`cache`]: content-addressed paths for cached downloads
//! - [`sorted`]: sort-order validation of feature streams
//! - [`formats`]: noodles-backed feature sources
//! - [`storage`]: storage backends and the download cache
//! - [`handlers`]: HTTP API

pub mod cache;
pub mod config;
pub mod error;
pub mod features;
pub mod files;
pub mod formats;
pub mod handlers;
pub mod naming;
pub mod query;
pub mod sorted;
pub mod storage;
pub mod timing;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
