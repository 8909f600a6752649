// crates/downloader/src/checksum.rs
//! Checksum validation of downloaded files
//!
//! A checksum resource is a small text document published next to the
//! download, either a bare digest or `sha256sum`-style lines. Validation
//! only reads; what happens to a failed candidate is the caller's call.

use crate::client::Client;
use crate::error::{DownloadError, DownloadResult};
use sha2::{Digest, Sha256, Sha512};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const BUF_SIZE: usize = 64 * 1024;

/// Digest algorithm of a checksum resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Sha256,
    Sha512,
}

/// Reference to the companion checksum document for a download.
#[derive(Debug, Clone)]
pub struct Checksum {
    /// URL of the checksum document.
    pub url: String,
    /// Digest algorithm the document carries.
    pub algorithm: ChecksumAlgorithm,
}

impl Checksum {
    /// A SHA-256 checksum document at `url`.
    pub fn sha256(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            algorithm: ChecksumAlgorithm::Sha256,
        }
    }

    /// A SHA-512 checksum document at `url`.
    pub fn sha512(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            algorithm: ChecksumAlgorithm::Sha512,
        }
    }

    /// Validates `candidate` against the digest published for `file_url`.
    ///
    /// Any fetch failure, parse failure, or digest mismatch is a
    /// validation failure.
    pub async fn validate(
        &self,
        client: &Client,
        file_url: &str,
        candidate: &Path,
    ) -> DownloadResult<()> {
        let failure = |reason: String| DownloadError::ChecksumMismatch {
            url: file_url.to_string(),
            reason,
        };

        let document = client
            .get_text(&self.url)
            .await
            .map_err(|err| failure(format!("fetching checksum document: {}", err)))?;

        let expected = parse_digest(&document, file_url).ok_or_else(|| {
            failure(format!(
                "no digest for '{}' in checksum document",
                basename(file_url)
            ))
        })?;

        let actual = file_digest(candidate, self.algorithm)
            .await
            .map_err(|err| failure(format!("reading candidate file: {}", err)))?;

        if expected.eq_ignore_ascii_case(&actual) {
            Ok(())
        } else {
            Err(failure(format!("expected {}, got {}", expected, actual)))
        }
    }
}

/// Extracts the expected digest from a checksum document.
///
/// Accepts a document that is a single bare digest, or `sha256sum`-style
/// lines of `<digest>  <filename>` matched against the basename of
/// `file_url` (a leading `*` binary marker on the filename is ignored).
fn parse_digest(document: &str, file_url: &str) -> Option<String> {
    let name = basename(file_url);
    let lines: Vec<&str> = document
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    for line in &lines {
        let mut fields = line.split_whitespace();
        let digest = fields.next()?;
        match fields.next() {
            // a bare digest only counts when it is the whole document
            None if lines.len() == 1 => return Some(digest.to_string()),
            Some(entry) if entry.trim_start_matches('*') == name => {
                return Some(digest.to_string());
            }
            _ => {}
        }
    }

    None
}

fn basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

async fn file_digest(path: &Path, algorithm: ChecksumAlgorithm) -> std::io::Result<String> {
    let mut file = File::open(path).await?;
    match algorithm {
        ChecksumAlgorithm::Sha256 => digest_file::<Sha256>(&mut file).await,
        ChecksumAlgorithm::Sha512 => digest_file::<Sha512>(&mut file).await,
    }
}

// chunked read keeps memory bounded for large files
async fn digest_file<D: Digest>(file: &mut File) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buf = vec![0u8; BUF_SIZE];

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HELLO_SHA256: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";

    #[test]
    fn test_parse_bare_digest() {
        assert_eq!(
            parse_digest("abc123\n", "https://example.com/file.bin"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_parse_sha256sum_line() {
        let document = format!("{}  file.bin\n", HELLO_SHA256);
        assert_eq!(
            parse_digest(&document, "https://example.com/file.bin"),
            Some(HELLO_SHA256.to_string())
        );
    }

    #[test]
    fn test_parse_picks_matching_line() {
        let document = "aaaa  other.bin\nbbbb  file.bin\ncccc  third.bin\n";
        assert_eq!(
            parse_digest(document, "https://example.com/dir/file.bin"),
            Some("bbbb".to_string())
        );
    }

    #[test]
    fn test_parse_binary_marker() {
        let document = "aaaa *file.bin\n";
        assert_eq!(
            parse_digest(document, "https://example.com/file.bin"),
            Some("aaaa".to_string())
        );
    }

    #[test]
    fn test_parse_no_match() {
        let document = "aaaa  other.bin\nbbbb  third.bin\n";
        assert_eq!(parse_digest(document, "https://example.com/file.bin"), None);
    }

    #[test]
    fn test_parse_empty_document() {
        assert_eq!(parse_digest("", "https://example.com/file.bin"), None);
        assert_eq!(parse_digest("\n\n", "https://example.com/file.bin"), None);
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("https://example.com/dir/file.bin"), "file.bin");
        assert_eq!(basename("file.bin"), "file.bin");
    }

    #[tokio::test]
    async fn test_file_digest_sha256() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello\n").unwrap();
        file.flush().unwrap();

        let digest = file_digest(file.path(), ChecksumAlgorithm::Sha256)
            .await
            .unwrap();
        assert_eq!(digest, HELLO_SHA256);
    }

    #[tokio::test]
    async fn test_file_digest_sha512_empty() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let digest = file_digest(file.path(), ChecksumAlgorithm::Sha512)
            .await
            .unwrap();
        assert_eq!(
            digest,
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[tokio::test]
    async fn test_file_digest_missing_file() {
        let result = file_digest(Path::new("/nonexistent"), ChecksumAlgorithm::Sha256).await;
        assert!(result.is_err());
    }
}
