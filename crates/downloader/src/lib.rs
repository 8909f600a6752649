// crates/downloader/src/lib.rs
//! Content-addressed, resumable download cache
//!
//! URLs map to cache entries keyed by the SHA-256 of the URL string.
//! Transfers resume from partial files, optionally verify against a
//! companion checksum document, and become visible under the committed
//! name only through a final atomic rename.

mod cache;
mod checksum;
mod client;
mod download;
mod error;
mod guest;
mod lock;
mod progress;
mod terminal;
mod transfer;

pub use cache::CacheLayout;
pub use checksum::{Checksum, ChecksumAlgorithm};
pub use client::{Client, ClientConfig};
pub use download::{Downloader, Request};
pub use error::{DownloadError, DownloadResult};
pub use guest::{GuestActions, LocalGuest};
pub use progress::ProgressMeter;
pub use terminal::Terminal;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_exports_accessible() {
        // Verify all types are exported
        let client = Client::new().expect("Failed to create client");
        let _: Downloader = Downloader::new(client, "/tmp/cachefetch-test", Terminal::disabled());
        let _: Request = Request::new("https://example.com/file");
        let _: CacheLayout = CacheLayout::new("/tmp/cachefetch-test");
    }
}
