use async_trait::async_trait;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::{ByteSource, available};
use crate::error::{Result, SourceError};

/// HTTP Range source for a remote resource
pub struct HttpRangeSource {
    client: Client,
    url: String,
    size: u64,
    transferred_bytes: AtomicU64,
    max_retry: u32,
}

impl HttpRangeSource {
    /// Create a new HTTP Range source
    ///
    /// This will send a HEAD request to verify Range support and get the resource size
    pub async fn new(url: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Self::with_client(client, url).await
    }

    /// Create a source sharing an existing client (and its connection pool)
    pub async fn with_client(client: Client, url: String) -> Result<Self> {
        let resp = client.head(&url).send().await?;

        if !resp.status().is_success() {
            return Err(SourceError::HttpStatus(resp.status()));
        }

        let accept_ranges = resp
            .headers()
            .get("accept-ranges")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none");

        if !accept_ranges.contains("bytes") {
            return Err(SourceError::RangeUnsupported);
        }

        let size = resp
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .ok_or(SourceError::MissingContentLength)?;

        log::debug!("{url}: {size} bytes, range requests supported");

        Ok(Self {
            client,
            url,
            size,
            transferred_bytes: AtomicU64::new(0),
            max_retry: 10,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get total bytes transferred from network
    pub fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ByteSource for HttpRangeSource {
    fn length(&self) -> u64 {
        self.size
    }

    async fn read_range(&self, position: u64, buf: &mut [u8]) -> Result<Option<usize>> {
        let Some(expected_size) = available(self.size, position, buf.len()) else {
            return Ok(None);
        };
        if expected_size == 0 {
            return Ok(Some(0));
        }

        let end = position + expected_size as u64 - 1;
        let mut received = 0;
        let mut retry_count = 0;

        while received < expected_size {
            let current_start = position + received as u64;
            let range = format!("bytes={}-{}", current_start, end);

            let result = self
                .client
                .get(&self.url)
                .header("Range", &range)
                .send()
                .await;

            match result {
                Ok(resp) => {
                    if resp.status() != reqwest::StatusCode::PARTIAL_CONTENT {
                        return Err(SourceError::HttpStatus(resp.status()));
                    }

                    let bytes = resp.bytes().await?;
                    if bytes.is_empty() {
                        break;
                    }
                    let chunk_len = bytes.len().min(expected_size - received);
                    buf[received..received + chunk_len].copy_from_slice(&bytes[..chunk_len]);
                    received += chunk_len;

                    self.transferred_bytes
                        .fetch_add(chunk_len as u64, Ordering::Relaxed);
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    retry_count += 1;
                    if retry_count >= self.max_retry {
                        return Err(SourceError::RetriesExhausted(self.max_retry));
                    }
                    log::warn!(
                        "Connection error, retry {}/{}: {}",
                        retry_count,
                        self.max_retry,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(500 * retry_count as u64)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(Some(received))
    }

    async fn release(&self) -> Result<()> {
        Ok(())
    }
}
