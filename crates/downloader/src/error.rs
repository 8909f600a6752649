// crates/downloader/src/error.rs
//! Error types for download operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type for download operations
pub type DownloadResult<T> = Result<T, DownloadError>;

/// Errors that can occur while resolving a URL to a cached file
///
/// Every variant names the offending URL or paths. Nothing here is
/// retried internally; callers retry by calling again, at which point
/// the resume logic picks up the preserved partial file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// HTTP client construction failed
    #[error("error building HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Cache directory could not be created
    #[error("error preparing cache dir for '{url}': {source}")]
    CacheDir {
        url: String,
        source: std::io::Error,
    },

    /// In-progress file could not be opened
    #[error("error creating destination file for '{url}': {source}")]
    OpenFile {
        url: String,
        source: std::io::Error,
    },

    /// In-progress file length could not be read
    #[error("error getting file stat for '{url}': {source}")]
    FileStat {
        url: String,
        source: std::io::Error,
    },

    /// Request failed before or while receiving the response
    #[error("error downloading '{url}': {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    /// Server replied with a status outside 2xx
    #[error("unexpected status code {status} for '{url}'")]
    UnexpectedStatus { url: String, status: u16 },

    /// In-progress file could not be truncated
    #[error("error truncating file for '{url}': {source}")]
    Truncate {
        url: String,
        source: std::io::Error,
    },

    /// Write cursor could not be positioned
    #[error("error seeking in file for '{url}': {source}")]
    Seek {
        url: String,
        source: std::io::Error,
    },

    /// Streaming the response body to disk failed
    #[error("error writing to file for '{url}': {source}")]
    StreamCopy {
        url: String,
        source: std::io::Error,
    },

    /// Downloaded bytes did not match the expected checksum
    #[error("error validating checksum for '{url}': {reason}")]
    ChecksumMismatch { url: String, reason: String },

    /// Final rename into the committed cache path failed
    #[error("error committing cache file for '{url}': {source}")]
    Commit {
        url: String,
        source: std::io::Error,
    },

    /// Copy to the destination failed
    #[error("error copying '{from}' to '{to}': {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}
