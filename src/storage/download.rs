//! Local cache for remote feature files.
//!
//! Each download lives under the content-addressed directory of its URL (see
//! [`crate::cache`]), named after the last path segment of the URL. A file
//! already present in the cache is used as-is; nothing is ever evicted here.

use crate::cache::cache_location;
use crate::files::{FeatureFile, url_file_name};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

const FALLBACK_FILE_NAME: &str = "download";

/// Local paths of a feature file and its index, ready for reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFiles {
    pub data: PathBuf,
    pub index: PathBuf,
}

pub struct DownloadCache {
    cache_dir: PathBuf,
    #[cfg(feature = "http")]
    client: reqwest::Client,
}

impl DownloadCache {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            cache_dir,
            #[cfg(feature = "http")]
            client: reqwest::Client::builder()
                .build()
                .map_err(|e| Error::Internal(format!("failed to create HTTP client: {}", e)))?,
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Where the download of `url` is stored.
    pub fn cached_path(&self, url: &str) -> PathBuf {
        let name = url_file_name(url).unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
        cache_location(&self.cache_dir, url).join(name)
    }

    /// Resolve a feature file to local paths, downloading remote files that
    /// are not cached yet.
    pub async fn materialize(&self, file: &FeatureFile) -> Result<LocalFiles> {
        let index = file
            .index
            .as_deref()
            .ok_or_else(|| Error::NotFound(format!("index for {}", file.name)))?;

        if !file.is_remote() {
            return Ok(LocalFiles {
                data: PathBuf::from(&file.path),
                index: PathBuf::from(index),
            });
        }

        Ok(LocalFiles {
            data: self.fetch(&file.path).await?,
            index: self.fetch(index).await?,
        })
    }

    async fn fetch(&self, url: &str) -> Result<PathBuf> {
        let path = self.cached_path(url);
        if fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(url, path = %path.display(), "cache hit");
            return Ok(path);
        }

        self.download(url, &path).await?;
        Ok(path)
    }

    #[cfg(feature = "http")]
    async fn download(&self, url: &str, path: &Path) -> Result<()> {
        tracing::debug!(url, path = %path.display(), "downloading into cache");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Internal(format!("HTTP GET request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::NotFound(url.to_string()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Internal(format!("failed to read HTTP response: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || store(&path, &bytes))
            .await
            .map_err(|e| Error::Internal(format!("failed to store download: {}", e)))?
    }

    #[cfg(not(feature = "http"))]
    async fn download(&self, url: &str, _path: &Path) -> Result<()> {
        Err(Error::UnsupportedFormat(format!(
            "remote file {} requires the `http` feature",
            url
        )))
    }
}

/// Write `bytes` to `path` through a temporary file in the same directory.
///
/// Concurrent writers never share a partial file. When another writer got
/// there first, its copy is kept and this one is discarded.
#[cfg(any(feature = "http", test))]
fn store(path: &Path, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;

    match file.persist_noclobber(path) {
        Ok(_) => Ok(()),
        Err(_) if path.exists() => {
            tracing::debug!(path = %path.display(), "download already cached by another request");
            Ok(())
        }
        Err(e) => Err(e.error.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::FileKind;
    use crate::types::Chromosome;
    use tempfile::TempDir;

    const DATA_URL: &str = "https://example.com/data/sample1.vcf.gz";
    const INDEX_URL: &str = "https://example.com/data/sample1.vcf.gz.tbi";

    #[test]
    fn test_cached_path() {
        let cache = DownloadCache::new(PathBuf::from("/tmp/cache")).unwrap();
        assert_eq!(
            cache.cached_path(DATA_URL),
            PathBuf::from("/tmp/cache/c3/a8/96/sample1.vcf.gz")
        );
        assert_eq!(
            cache.cached_path(INDEX_URL),
            PathBuf::from("/tmp/cache/7f/f4/d0/sample1.vcf.gz.tbi")
        );
        assert_eq!(
            cache.cached_path("https://example.com/"),
            cache_location(Path::new("/tmp/cache"), "https://example.com/").join("download")
        );
    }

    #[tokio::test]
    async fn test_materialize_local_file() {
        let cache = DownloadCache::new(PathBuf::from("/tmp/cache")).unwrap();
        let file = FeatureFile::local(
            FileKind::Bed,
            Path::new("/data/genes.bed.gz"),
            Some(Path::new("/data/genes.bed.gz.tbi")),
        );

        let local = cache.materialize(&file).await.unwrap();
        assert_eq!(local.data, PathBuf::from("/data/genes.bed.gz"));
        assert_eq!(local.index, PathBuf::from("/data/genes.bed.gz.tbi"));
    }

    #[tokio::test]
    async fn test_materialize_uses_cached_downloads() {
        let dir = TempDir::new().unwrap();
        let cache = DownloadCache::new(dir.path().to_path_buf()).unwrap();

        for url in [DATA_URL, INDEX_URL] {
            let path = cache.cached_path(url);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, b"cached").unwrap();
        }

        let file = FeatureFile::non_registered(
            FileKind::Vcf,
            DATA_URL,
            INDEX_URL,
            &Chromosome::new("1"),
        );
        let local = cache.materialize(&file).await.unwrap();
        assert_eq!(local.data, dir.path().join("c3/a8/96/sample1.vcf.gz"));
        assert_eq!(local.index, dir.path().join("7f/f4/d0/sample1.vcf.gz.tbi"));
    }

    #[tokio::test]
    async fn test_materialize_requires_index() {
        let cache = DownloadCache::new(PathBuf::from("/tmp/cache")).unwrap();
        let file = FeatureFile::local(FileKind::Vcf, Path::new("/data/a.vcf.gz"), None);
        assert!(matches!(
            cache.materialize(&file).await,
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_store_keeps_first_copy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample1.vcf.gz");

        store(&path, b"first").unwrap();
        store(&path, b"second").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"first");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_store_concurrent_writers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample1.vcf.gz.tbi");
        let content = vec![7u8; 256 * 1024];

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| store(&path, &content).unwrap());
            }
        });

        assert_eq!(std::fs::read(&path).unwrap(), content);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
