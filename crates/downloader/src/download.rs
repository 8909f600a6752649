// crates/downloader/src/download.rs
//! Download facade
//!
//! Resolves a request to a committed cache path, or copies the result (or
//! a plain local file) to a destination through the guest copy capability.

use crate::cache::CacheLayout;
use crate::checksum::Checksum;
use crate::client::Client;
use crate::error::{DownloadError, DownloadResult};
use crate::guest::GuestActions;
use crate::terminal::Terminal;
use crate::transfer::TransferEngine;
use std::path::{Path, PathBuf};

/// A single download request.
#[derive(Debug, Clone)]
pub struct Request {
    /// Resource URL, treated as an opaque string. A URL starting with `/`
    /// names a local file and bypasses both network and cache.
    pub url: String,
    /// Companion checksum resource, when the download must be verified.
    pub checksum: Option<Checksum>,
}

impl Request {
    /// Creates a request without checksum verification.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            checksum: None,
        }
    }

    /// Attaches a checksum resource to verify the download against.
    pub fn with_checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }
}

/// Entry point for cached downloads.
pub struct Downloader {
    engine: TransferEngine,
}

impl Downloader {
    /// Creates a downloader writing beneath `cache_root`.
    pub fn new(client: Client, cache_root: impl Into<PathBuf>, terminal: Terminal) -> Self {
        let layout = CacheLayout::new(cache_root);
        Self {
            engine: TransferEngine::new(client, layout, terminal),
        }
    }

    /// The cache layout this downloader writes to.
    pub fn layout(&self) -> &CacheLayout {
        self.engine.layout()
    }

    /// Returns the committed cache path for `request`, downloading first
    /// when not already cached. A committed entry is returned as-is with
    /// no network activity and no re-validation.
    pub async fn fetch(&self, request: &Request) -> DownloadResult<PathBuf> {
        self.engine.fetch(request).await
    }

    /// Copies the file behind `request` to `dest` via `guest`.
    ///
    /// A URL starting with `/` is copied directly, with no network and no
    /// cache involvement. Anything else is fetched into the cache first.
    pub async fn fetch_to<G: GuestActions>(
        &self,
        guest: &G,
        request: &Request,
        dest: &Path,
    ) -> DownloadResult<()> {
        // a file already on the filesystem only needs a copy
        if request.url.starts_with('/') {
            let source = Path::new(&request.url);
            return copy_via(guest, source, dest).await;
        }

        let cache_file = self.fetch(request).await?;
        copy_via(guest, &cache_file, dest).await
    }
}

async fn copy_via<G: GuestActions>(guest: &G, source: &Path, dest: &Path) -> DownloadResult<()> {
    guest
        .copy_file(source, dest)
        .await
        .map_err(|source_err| DownloadError::Copy {
            from: source.to_path_buf(),
            to: dest.to_path_buf(),
            source: source_err,
        })
}
