// crates/downloader/src/transfer.rs
//! Resumable transfer engine
//!
//! Per cache key the on-disk entry moves through
//! `Absent -> InProgress -> {Committed | Quarantined}`. The commit rename
//! is the only point at which an entry becomes visible under its final
//! name; partial state only ever exists under the `.downloading` name.
//!
//! Nothing here retries. Every non-validation failure leaves the partial
//! file in place so the next call resumes from its current length.

use crate::cache::CacheLayout;
use crate::client::Client;
use crate::download::Request;
use crate::error::{DownloadError, DownloadResult};
use crate::lock::KeyLocks;
use crate::progress::ProgressMeter;
use crate::terminal::Terminal;
use futures::StreamExt;
use reqwest::StatusCode;
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

pub(crate) struct TransferEngine {
    client: Client,
    layout: CacheLayout,
    terminal: Terminal,
    locks: KeyLocks,
}

impl TransferEngine {
    pub(crate) fn new(client: Client, layout: CacheLayout, terminal: Terminal) -> Self {
        Self {
            client,
            layout,
            terminal,
            locks: KeyLocks::new(),
        }
    }

    pub(crate) fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Resolves `request` to a committed cache path, transferring if needed.
    pub(crate) async fn fetch(&self, request: &Request) -> DownloadResult<PathBuf> {
        let url = request.url.as_str();
        let committed = self.layout.committed(url);

        // serialize same-URL callers; distinct URLs proceed independently
        let _guard = self.locks.acquire(&CacheLayout::key(url)).await;

        if committed.exists() {
            log::trace!("cache hit for {}", url);
            return Ok(committed);
        }

        if let Err(err) = self.transfer(request).await {
            log::trace!("error downloading {}: {}", url, err);
            return Err(err);
        }

        Ok(committed)
    }

    async fn transfer(&self, request: &Request) -> DownloadResult<()> {
        let url = request.url.as_str();
        log::trace!("downloading {}", url);

        // written under a temporary name until fully transferred and
        // validated; the rename at the end is the only visibility point
        let in_progress = self.layout.in_progress(url);

        fs::create_dir_all(self.layout.caches_dir())
            .await
            .map_err(|source| DownloadError::CacheDir {
                url: url.to_string(),
                source,
            })?;

        // open without truncating: existing bytes are a resumable prefix
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&in_progress)
            .await
            .map_err(|source| DownloadError::OpenFile {
                url: url.to_string(),
                source,
            })?;

        let current_size = file
            .metadata()
            .await
            .map_err(|source| DownloadError::FileStat {
                url: url.to_string(),
                source,
            })?
            .len();

        if current_size > 0 {
            log::trace!("resuming download from byte {}", current_size);
        }
        let response = self
            .client
            .get(url, (current_size > 0).then_some(current_size))
            .await?;

        // the server cannot extend our partial data; discard it so the
        // next attempt starts over from byte zero
        if response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            file.set_len(0)
                .await
                .map_err(|source| DownloadError::Truncate {
                    url: url.to_string(),
                    source,
                })?;
        }

        if !response.status().is_success() {
            return Err(DownloadError::UnexpectedStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let is_partial = response.status() == StatusCode::PARTIAL_CONTENT;
        let declared = response.content_length();

        if is_partial {
            // the response is the remainder; append after our prefix
            file.seek(SeekFrom::End(0))
                .await
                .map_err(|source| DownloadError::Seek {
                    url: url.to_string(),
                    source,
                })?;
        } else {
            // the server ignored the range and is sending the whole
            // object; overwrite from byte zero and drop any longer stale
            // tail so no prior garbage survives past the new end
            let new_len = declared.unwrap_or(0);
            if current_size > new_len {
                file.set_len(new_len)
                    .await
                    .map_err(|source| DownloadError::Truncate {
                        url: url.to_string(),
                        source,
                    })?;
            }
            file.seek(SeekFrom::Start(0))
                .await
                .map_err(|source| DownloadError::Seek {
                    url: url.to_string(),
                    source,
                })?;
        }

        let total = match declared {
            Some(len) if is_partial => (len + current_size) as i64,
            Some(len) => len as i64,
            None => -1,
        };
        let already = if is_partial { current_size as i64 } else { 0 };
        let progress = ProgressMeter::new(self.terminal.clone(), total, already);

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| DownloadError::Transport {
                url: url.to_string(),
                source,
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|source| DownloadError::StreamCopy {
                    url: url.to_string(),
                    source,
                })?;
            progress.record(chunk.len());
        }

        file.flush()
            .await
            .map_err(|source| DownloadError::StreamCopy {
                url: url.to_string(),
                source,
            })?;
        drop(file);

        if let Some(checksum) = &request.checksum {
            if let Err(err) = checksum.validate(&self.client, url, &in_progress).await {
                // move the bad file aside so the next attempt starts
                // clean; a failed rename must not mask the checksum error
                let quarantined = self.layout.quarantined(url);
                if let Err(rename_err) = fs::rename(&in_progress, &quarantined).await {
                    log::warn!(
                        "failed to quarantine {}: {}",
                        in_progress.display(),
                        rename_err
                    );
                }
                return Err(err);
            }
        }

        fs::rename(&in_progress, self.layout.committed(url))
            .await
            .map_err(|source| DownloadError::Commit {
                url: url.to_string(),
                source,
            })?;

        log::trace!("downloaded {}", url);
        Ok(())
    }
}
