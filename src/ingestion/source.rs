//! Snapshot Sources
//!
//! A `ByteSource` yields the raw columnar payload. `HttpSource` issues a single GET
//! per call; retrying is the pipeline's concern.

use crate::error::{DataLoadError, Result, SalesError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Fetch the full payload once
    async fn fetch(&self) -> std::result::Result<Vec<u8>, DataLoadError>;

    /// Human-readable location, used in logs
    fn describe(&self) -> String;
}

/// Fetches the snapshot over HTTP(S)
#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SalesError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> DataLoadError {
        if err.is_timeout() {
            DataLoadError::Timeout {
                url: self.url.clone(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else if let Some(status) = err.status() {
            DataLoadError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            }
        } else {
            DataLoadError::Connection {
                url: self.url.clone(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl ByteSource for HttpSource {
    async fn fetch(&self) -> std::result::Result<Vec<u8>, DataLoadError> {
        debug!("GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataLoadError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                self.classify(e)
            } else {
                DataLoadError::Body {
                    url: self.url.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        debug!("Fetched {} bytes from {}", body.len(), self.url);
        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Serves a fixed payload; useful for local snapshots and tests
#[derive(Debug, Clone)]
pub struct StaticSource {
    payload: Vec<u8>,
}

impl StaticSource {
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }
}

#[async_trait]
impl ByteSource for StaticSource {
    async fn fetch(&self) -> std::result::Result<Vec<u8>, DataLoadError> {
        Ok(self.payload.clone())
    }

    fn describe(&self) -> String {
        format!("static payload ({} bytes)", self.payload.len())
    }
}
