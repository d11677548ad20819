//! Feature file descriptors.
//!
//! [`FeatureFile`] describes where a file and its index live. Files that are
//! not registered with a storage backend are built on the fly from a URL pair
//! with [`FeatureFile::non_registered`], one constructor for every
//! [`FileKind`].

use crate::types::Chromosome;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const GZ_EXTENSION: &str = ".gz";

/// Kinds of tabix-indexed feature files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    #[default]
    Vcf,
    Bed,
    Gff,
}

impl FileKind {
    pub const ALL: [FileKind; 3] = [FileKind::Vcf, FileKind::Bed, FileKind::Gff];

    /// Extension of the bgzip-compressed data file.
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Vcf => "vcf.gz",
            FileKind::Bed => "bed.gz",
            FileKind::Gff => "gff.gz",
        }
    }

    pub fn index_extension(&self) -> &'static str {
        "tbi"
    }

    /// Whether start positions are stored 0-based (BED) rather than 1-based.
    pub fn zero_based(&self) -> bool {
        matches!(self, FileKind::Bed)
    }

    /// Detect the kind from a file name or URL path.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        match file_extension(file_name).as_str() {
            ".vcf" | ".vcf.gz" => Some(FileKind::Vcf),
            ".bed" | ".bed.gz" => Some(FileKind::Bed),
            ".gff" | ".gff.gz" | ".gff3" | ".gff3.gz" | ".gtf" | ".gtf.gz" => Some(FileKind::Gff),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    File,
    Url,
}

/// Location of a feature file and its index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureFile {
    pub kind: FileKind,
    pub name: String,
    /// Local path or URL, depending on `resource_type`
    pub path: String,
    pub index: Option<String>,
    pub compressed: bool,
    pub resource_type: ResourceType,
    pub reference_id: Option<u64>,
}

impl FeatureFile {
    /// A file on the local filesystem.
    pub fn local(kind: FileKind, path: &Path, index: Option<&Path>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            kind,
            name,
            path: path.display().to_string(),
            index: index.map(|p| p.display().to_string()),
            compressed: true,
            resource_type: ResourceType::File,
            reference_id: None,
        }
    }

    /// A file served over HTTP(S).
    pub fn remote(kind: FileKind, file_url: &str, index_url: &str) -> Self {
        Self {
            kind,
            name: url_file_name(file_url).unwrap_or_else(|| file_url.to_string()),
            path: file_url.to_string(),
            index: Some(index_url.to_string()),
            compressed: false,
            resource_type: ResourceType::Url,
            reference_id: None,
        }
    }

    /// A remote file that is not registered with any storage backend,
    /// attached to the reference genome of `chromosome`.
    pub fn non_registered(
        kind: FileKind,
        file_url: &str,
        index_url: &str,
        chromosome: &Chromosome,
    ) -> Self {
        Self {
            reference_id: chromosome.reference_id,
            ..Self::remote(kind, file_url, index_url)
        }
    }

    pub fn is_remote(&self) -> bool {
        self.resource_type == ResourceType::Url
    }

    pub fn local_path(&self) -> Option<PathBuf> {
        (!self.is_remote()).then(|| PathBuf::from(&self.path))
    }
}

/// Last path segment of a URL, if it has one.
pub fn url_file_name(file_url: &str) -> Option<String> {
    let url = url::Url::parse(file_url).ok()?;
    url.path_segments()?
        .next_back()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Strip `extension` (given with its leading dot) from `file_name`.
///
/// Both arguments are trimmed first. Returns `None` for a blank file name and
/// the trimmed file name when the extension is blank or doesn't match.
///
/// ```
/// use contigq::files::remove_file_extension;
///
/// assert_eq!(remove_file_extension(" calls.vcf ", ".vcf").as_deref(), Some("calls"));
/// assert_eq!(remove_file_extension("calls.vcf", ".bed").as_deref(), Some("calls.vcf"));
/// assert_eq!(remove_file_extension("  ", ".vcf"), None);
/// ```
pub fn remove_file_extension(file_name: &str, extension: &str) -> Option<String> {
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return None;
    }

    let extension = extension.trim();
    match file_name.strip_suffix(extension) {
        Some(stem) if !extension.is_empty() => Some(stem.trim().to_string()),
        _ => Some(file_name.to_string()),
    }
}

/// Extension of a file name with its leading dot, keeping a `.gz` suffix.
///
/// `"calls.vcf.gz"` gives `".vcf.gz"`, `"genes.bed"` gives `".bed"`. A
/// compressed file with no inner extension gives `".gz"`, a name without
/// any extension gives an empty string.
pub fn file_extension(file_name: &str) -> String {
    let (stem, compressed) = match file_name.strip_suffix(GZ_EXTENSION) {
        Some(stem) => (stem, true),
        None => (file_name, false),
    };

    let base = stem.rsplit(['/', '\\']).next().unwrap_or(stem);
    let inner = base
        .rsplit_once('.')
        .map(|(_, ext)| format!(".{ext}"))
        .unwrap_or_default();

    if compressed {
        format!("{inner}{GZ_EXTENSION}")
    } else {
        inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("calls.vcf.gz"), ".vcf.gz");
        assert_eq!(file_extension("genes.bed"), ".bed");
        assert_eq!(file_extension("/data/v1.2/genes"), "");
        assert_eq!(file_extension("archive.gz"), ".gz");
        assert_eq!(file_extension("dir.d/sample.gff3.gz"), ".gff3.gz");
    }

    #[test]
    fn test_remove_file_extension() {
        assert_eq!(remove_file_extension("a.vcf", ".vcf").as_deref(), Some("a"));
        assert_eq!(remove_file_extension("a .vcf", " .vcf ").as_deref(), Some("a"));
        assert_eq!(remove_file_extension("a.vcf", "").as_deref(), Some("a.vcf"));
        assert_eq!(remove_file_extension("", ".vcf"), None);
        // Without the leading dot the dot stays
        assert_eq!(remove_file_extension("a.vcf", "vcf").as_deref(), Some("a."));
    }

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(FileKind::from_file_name("s.vcf.gz"), Some(FileKind::Vcf));
        assert_eq!(FileKind::from_file_name("s.bed.gz"), Some(FileKind::Bed));
        assert_eq!(FileKind::from_file_name("s.gtf.gz"), Some(FileKind::Gff));
        assert_eq!(FileKind::from_file_name("s.bam"), None);
    }

    #[test]
    fn test_non_registered_file() {
        let chromosome = Chromosome::new("chr1").with_reference_id(7);
        let file = FeatureFile::non_registered(
            FileKind::Vcf,
            "https://example.com/data/sample1.vcf.gz",
            "https://example.com/data/sample1.vcf.gz.tbi",
            &chromosome,
        );

        assert_eq!(file.name, "sample1.vcf.gz");
        assert_eq!(file.path, "https://example.com/data/sample1.vcf.gz");
        assert_eq!(
            file.index.as_deref(),
            Some("https://example.com/data/sample1.vcf.gz.tbi")
        );
        assert!(!file.compressed);
        assert!(file.is_remote());
        assert_eq!(file.reference_id, Some(7));
        assert_eq!(file.local_path(), None);
    }

    #[test]
    fn test_local_file() {
        let file = FeatureFile::local(
            FileKind::Bed,
            Path::new("/data/genes.bed.gz"),
            Some(Path::new("/data/genes.bed.gz.tbi")),
        );
        assert_eq!(file.name, "genes.bed.gz");
        assert_eq!(file.local_path(), Some(PathBuf::from("/data/genes.bed.gz")));
        assert!(!file.is_remote());
    }
}
