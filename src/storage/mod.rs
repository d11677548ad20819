//! Storage backend abstraction for feature files.
//!
//! A [`Storage`] backend maps a file id to a [`FeatureFile`] describing where
//! the data file and its tabix index live. Remote files are materialized
//! locally through the [`DownloadCache`] before they are queried.
//!
//! # Implementations
//!
//! - [`LocalStorage`] - Local filesystem storage
//! - [`HttpStorage`] - Files served over HTTP/HTTPS (`http` feature)
//!
//! # Example
//!
//! ```no_run
//! use contigq::storage::{Storage, LocalStorage};
//! use contigq::files::FileKind;
//! use std::path::PathBuf;
//!
//! # async fn example() -> contigq::Result<()> {
//! let storage = LocalStorage::new(PathBuf::from("./data"));
//! let file = storage.feature_file("sample", FileKind::Vcf).await?;
//! # Ok(())
//! # }
//! ```

mod download;
#[cfg(feature = "http")]
mod http;
mod local;

pub use download::{DownloadCache, LocalFiles};
#[cfg(feature = "http")]
pub use http::HttpStorage;
pub use local::LocalStorage;

use crate::{Result, files::FeatureFile, files::FileKind};
use async_trait::async_trait;

/// Storage backend trait for locating feature files
#[async_trait]
pub trait Storage: Send + Sync {
    /// Check if a file exists
    async fn exists(&self, id: &str, kind: FileKind) -> Result<bool>;

    /// Describe a file and its index.
    ///
    /// Fails with `NotFound` when the file or its index is missing.
    async fn feature_file(&self, id: &str, kind: FileKind) -> Result<FeatureFile>;
}
