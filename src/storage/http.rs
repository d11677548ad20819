//! HTTP/HTTPS storage backend for feature files.
//!
//! Files are addressed as `{base_url}/{id}.{ext}` with the tabix index next to
//! them as `{base_url}/{id}.{ext}.tbi`. The files themselves are fetched into
//! the [`DownloadCache`](super::DownloadCache) on first query.

use super::Storage;
use crate::files::{FeatureFile, FileKind};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

/// HTTP/HTTPS storage backend for feature files.
pub struct HttpStorage {
    client: Client,
    base_url: String,
}

impl HttpStorage {
    /// Create a new HttpStorage instance.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL for data files (e.g., "https://example.com/data/")
    pub fn new(base_url: String) -> Result<Self> {
        url::Url::parse(&base_url)
            .map_err(|e| Error::InvalidInput(format!("invalid base URL {}: {}", base_url, e)))?;

        let client = Client::builder()
            .build()
            .map_err(|e| Error::Internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Construct the URL for a data file.
    fn file_url(&self, id: &str, kind: FileKind) -> String {
        format!("{}/{}.{}", self.base_url, id, kind.extension())
    }

    /// Construct the URL for an index file.
    fn index_url(&self, id: &str, kind: FileKind) -> String {
        format!("{}.{}", self.file_url(id, kind), kind.index_extension())
    }

    /// Check if a URL exists via HEAD request.
    async fn url_exists(&self, url: &str) -> bool {
        self.client
            .head(url)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl Storage for HttpStorage {
    async fn exists(&self, id: &str, kind: FileKind) -> Result<bool> {
        let url = self.file_url(id, kind);
        Ok(self.url_exists(&url).await)
    }

    async fn feature_file(&self, id: &str, kind: FileKind) -> Result<FeatureFile> {
        let url = self.file_url(id, kind);
        if !self.url_exists(&url).await {
            return Err(Error::NotFound(id.to_string()));
        }

        let index_url = self.index_url(id, kind);
        if !self.url_exists(&index_url).await {
            return Err(Error::NotFound(format!("index for {}", id)));
        }

        Ok(FeatureFile::remote(kind, &url, &index_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_urls() {
        let storage = HttpStorage::new("https://example.com/data/".to_string()).unwrap();
        assert_eq!(
            storage.file_url("sample1", FileKind::Vcf),
            "https://example.com/data/sample1.vcf.gz"
        );
        assert_eq!(
            storage.index_url("sample1", FileKind::Bed),
            "https://example.com/data/sample1.bed.gz.tbi"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpStorage::new("not a url".to_string()),
            Err(Error::InvalidInput(_))
        ));
    }
}
