// crates/downloader/src/guest.rs
//! Guest copy capability
//!
//! The host/guest execution abstraction lives outside this crate; the
//! downloader only needs the one operation it invokes, copying a file to
//! a destination the consuming environment can reach.

use async_trait::async_trait;
use std::io;
use std::path::Path;

/// Copy capability of the consuming environment.
#[async_trait]
pub trait GuestActions: Send + Sync {
    /// Copies `source` to `dest`.
    ///
    /// `dest` must be an absolute path writable without elevated
    /// privilege; that contract is the caller's, not validated here.
    async fn copy_file(&self, source: &Path, dest: &Path) -> io::Result<()>;
}

/// Copies within the local filesystem, for CLI use and tests.
#[derive(Debug, Default, Clone)]
pub struct LocalGuest;

#[async_trait]
impl GuestActions for LocalGuest {
    async fn copy_file(&self, source: &Path, dest: &Path) -> io::Result<()> {
        tokio::fs::copy(source, dest).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_guest_copies() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let dest = dir.path().join("dest");
        tokio::fs::write(&source, b"payload").await.unwrap();

        LocalGuest.copy_file(&source, &dest).await.unwrap();

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_local_guest_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = LocalGuest
            .copy_file(&dir.path().join("absent"), &dir.path().join("dest"))
            .await;
        assert!(result.is_err());
    }
}
