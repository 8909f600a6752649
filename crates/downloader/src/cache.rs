// crates/downloader/src/cache.rs
//! Cache path derivation
//!
//! A URL maps to `<root>/caches/<hex(sha256(url))>`. The URL is hashed as
//! an opaque byte string with no normalization, so two URLs differing only
//! in a trailing slash or query order are distinct cache entries.

use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Suffix marking a partially-downloaded entry.
const DOWNLOADING_SUFFIX: &str = ".downloading";

/// Suffix appended to a partial entry that failed validation.
const INVALID_SUFFIX: &str = ".invalid";

/// On-disk layout of the download cache.
#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    /// Creates a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Hex cache key for a URL.
    pub fn key(url: &str) -> String {
        hex::encode(Sha256::digest(url.as_bytes()))
    }

    /// Directory holding every cache entry.
    pub fn caches_dir(&self) -> PathBuf {
        self.root.join("caches")
    }

    /// Path of the committed (fully transferred and validated) entry.
    pub fn committed(&self, url: &str) -> PathBuf {
        self.caches_dir().join(Self::key(url))
    }

    /// Path of the in-progress, resumable partial file.
    pub fn in_progress(&self, url: &str) -> PathBuf {
        append_suffix(self.committed(url), DOWNLOADING_SUFFIX)
    }

    /// Path a failed-validation file is moved aside to.
    ///
    /// Quarantined files are never read back as cache hits and never
    /// cleaned up automatically.
    pub fn quarantined(&self, url: &str) -> PathBuf {
        append_suffix(self.in_progress(url), INVALID_SUFFIX)
    }
}

fn append_suffix(path: PathBuf, suffix: &str) -> PathBuf {
    let mut raw = path.into_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_sha256_hex() {
        // sha256("abc")
        assert_eq!(
            CacheLayout::key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_committed_path_under_caches_dir() {
        let layout = CacheLayout::new("/var/cache/cachefetch");
        let path = layout.committed("abc");
        assert_eq!(
            path,
            PathBuf::from(
                "/var/cache/cachefetch/caches/ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
            )
        );
    }

    #[test]
    fn test_urls_are_not_normalized() {
        let layout = CacheLayout::new("/cache");
        assert_ne!(
            layout.committed("https://example.com/file"),
            layout.committed("https://example.com/file/")
        );
    }

    #[test]
    fn test_in_progress_appends_suffix() {
        let layout = CacheLayout::new("/cache");
        let committed = layout.committed("https://example.com/file");
        let in_progress = layout.in_progress("https://example.com/file");

        let mut expected = committed.into_os_string();
        expected.push(".downloading");
        assert_eq!(in_progress, PathBuf::from(expected));
    }

    #[test]
    fn test_quarantined_appends_to_in_progress() {
        let layout = CacheLayout::new("/cache");
        let in_progress = layout.in_progress("https://example.com/file");
        let quarantined = layout.quarantined("https://example.com/file");

        let mut expected = in_progress.into_os_string();
        expected.push(".invalid");
        assert_eq!(quarantined, PathBuf::from(expected));
    }

    #[test]
    fn test_same_url_is_deterministic() {
        let layout = CacheLayout::new("/cache");
        assert_eq!(
            layout.committed("https://example.com/a"),
            layout.committed("https://example.com/a")
        );
    }
}
