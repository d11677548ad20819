use super::Storage;
use crate::files::{FeatureFile, FileKind};
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

pub struct LocalStorage {
    data_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn make_file_path(&self, id: &str, kind: FileKind) -> PathBuf {
        self.data_dir.join(format!("{}.{}", id, kind.extension()))
    }

    fn make_index_path(&self, id: &str, kind: FileKind) -> PathBuf {
        self.data_dir.join(format!(
            "{}.{}.{}",
            id,
            kind.extension(),
            kind.index_extension()
        ))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn exists(&self, id: &str, kind: FileKind) -> Result<bool> {
        if !is_safe_id(id) {
            return Ok(false);
        }
        let path = self.make_file_path(id, kind);
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn feature_file(&self, id: &str, kind: FileKind) -> Result<FeatureFile> {
        if !self.exists(id, kind).await? {
            return Err(Error::NotFound(id.to_string()));
        }

        let index_path = self.make_index_path(id, kind);
        if !fs::try_exists(&index_path).await.unwrap_or(false) {
            return Err(Error::NotFound(format!("index for {}", id)));
        }

        Ok(FeatureFile::local(
            kind,
            &self.make_file_path(id, kind),
            Some(&index_path),
        ))
    }
}

/// Ids name a file directly inside the data directory.
fn is_safe_id(id: &str) -> bool {
    !id.is_empty() && !id.contains("..") && !id.contains('/') && !id.contains('\\')
}
