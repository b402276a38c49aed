//! Fetching remote blobs into local files

use crate::error::{DownloadError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const DEFAULT_USER_AGENT: &str = "file-blob-cache/0.1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Streams the resource at a URL into a file
///
/// Implementations may leave a partial file behind on error; the cache
/// deletes it.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Write the body of `url` to `dest`, returning the number of bytes
    async fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Downloader over HTTP(S)
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Create a downloader with the default request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Use a preconfigured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        debug!(url = %url, "Downloading blob");

        let mut response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %url, "Failed to download blob");
            return Err(DownloadError::Status(response.status().as_u16()));
        }

        let mut file = fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(url = %url, size = written, "Downloaded blob");
        Ok(written)
    }
}
