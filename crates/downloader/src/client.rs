// crates/downloader/src/client.rs
//! HTTP client wrapper with bounded connection setup

use crate::error::{DownloadError, DownloadResult};
use reqwest::{Client as ReqwestClient, Response};
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Timeout for response headers and for stalls between body chunks
    pub read_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(30),
            user_agent: format!("cachefetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client for cache transfers
#[derive(Clone)]
pub struct Client {
    inner: ReqwestClient,
}

impl Client {
    /// Creates a new client with default configuration
    pub fn new() -> DownloadResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a new client with custom configuration
    ///
    /// No total request deadline is set: a large transfer on a slow link
    /// may legitimately run for hours. Only connection setup and stalls
    /// between reads are bounded.
    pub fn with_config(config: ClientConfig) -> DownloadResult<Self> {
        let inner = ReqwestClient::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(DownloadError::Client)?;

        Ok(Self { inner })
    }

    /// Performs a GET request, with a byte-range header when resuming
    pub async fn get(&self, url: &str, resume_from: Option<u64>) -> DownloadResult<Response> {
        let mut request = self.inner.get(url);
        if let Some(offset) = resume_from {
            request = request.header(reqwest::header::RANGE, format!("bytes={}-", offset));
        }

        request
            .send()
            .await
            .map_err(|source| DownloadError::Transport {
                url: url.to_string(),
                source,
            })
    }

    /// Fetches a small text resource in full, such as a checksum document
    pub async fn get_text(&self, url: &str) -> DownloadResult<String> {
        let response = self.get(url, None).await?;

        if !response.status().is_success() {
            return Err(DownloadError::UnexpectedStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| DownloadError::Transport {
                url: url.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.read_timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("cachefetch/"));
    }

    #[test]
    fn test_client_creation() {
        let client = Client::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_with_custom_config() {
        let config = ClientConfig {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(5),
            user_agent: "TestAgent".to_string(),
        };

        let client = Client::with_config(config);
        assert!(client.is_ok());
    }
}
