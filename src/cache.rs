//! Content-addressed locations for cached remote downloads.
//!
//! A remote file is cached under a directory derived from its URL: the first
//! [`HASH_SIZE`] hex characters of the URL's MD5 digest, split into
//! two-character segments. `http://example.org/a.bam` hashes to `d2c6e0` and
//! lands under `/d2/c6/e0/`.
//!
//! The hash only shards directories. Six hex characters give 24 bits, so
//! unrelated URLs can share a directory; files inside it are told apart by
//! name. MD5 and the truncation length must stay as they are for existing
//! cache layouts to remain valid.

use std::path::{Path, PathBuf};

/// Length of the hex hash used for sharding.
pub const HASH_SIZE: usize = 6;

const SEGMENT_WIDTH: usize = 2;
const DELIMITER: &str = "/";

/// Hash a URL (or any identifying string) into a [`HASH_SIZE`] lowercase
/// hex string.
///
/// ```
/// use contigq::cache::hash_from_url;
///
/// assert_eq!(hash_from_url("http://example.org/a.bam"), "d2c6e0");
/// ```
#[must_use]
pub fn hash_from_url(url: &str) -> String {
    let digest = md5::compute(url.as_bytes());
    let mut hex = format!("{digest:x}");
    hex.truncate(HASH_SIZE);
    hex
}

/// Expand a hash into a sharded path with a leading and trailing delimiter.
///
/// The last segment holds whatever is left over, so odd-length hashes end
/// with a one-character segment. An empty hash yields `"//"`.
#[must_use]
pub fn path_from_hash(hash: &str) -> String {
    let mut path = String::from(DELIMITER);
    let chars: Vec<char> = hash.chars().collect();
    if chars.is_empty() {
        path.push_str(DELIMITER);
        return path;
    }

    for segment in chars.chunks(SEGMENT_WIDTH) {
        path.extend(segment);
        path.push_str(DELIMITER);
    }
    path
}

/// Sharded path for a URL, e.g. `"/d2/c6/e0/"`.
#[must_use]
pub fn sharded_path(url: &str) -> String {
    path_from_hash(&hash_from_url(url))
}

/// Directory under `root` where the download of `url` is cached.
///
/// No I/O is performed.
pub fn cache_location(root: &Path, url: &str) -> PathBuf {
    let hash = hash_from_url(url);
    let chars: Vec<char> = hash.chars().collect();
    chars
        .chunks(SEGMENT_WIDTH)
        .fold(root.to_path_buf(), |dir, segment| {
            dir.join(segment.iter().collect::<String>())
        })
}
