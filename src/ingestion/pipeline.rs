//! Ingestion Pipeline
//!
//! fetch (with retry) -> decode -> validate -> coerce/clean -> timestamped table.
//! Any failure aborts the attempt; no partial table is ever returned.

use crate::config::Settings;
use crate::error::{Result, SalesError};
use crate::ingestion::decode::decode_arrow;
use crate::ingestion::retry::{retry_with_backoff, RetryPolicy};
use crate::ingestion::schema::{build_table, CleaningReport};
use crate::ingestion::source::{ByteSource, HttpSource};
use crate::model::SalesTable;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

/// A successfully ingested table and when it was produced
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: SalesTable,
    pub refreshed_at: DateTime<Utc>,
}

impl LoadedTable {
    pub fn new(table: SalesTable) -> Self {
        Self {
            table,
            refreshed_at: Utc::now(),
        }
    }
}

/// Anything able to produce a full table on demand
#[async_trait]
pub trait TableLoader: Send + Sync {
    async fn load(&self) -> Result<LoadedTable>;
}

pub struct IngestionPipeline {
    source: Arc<dyn ByteSource>,
    retry: RetryPolicy,
}

impl IngestionPipeline {
    pub fn new(source: Arc<dyn ByteSource>, retry: RetryPolicy) -> Self {
        Self { source, retry }
    }

    /// HTTP source and retry policy taken from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let source = HttpSource::new(settings.data_source_url.clone(), settings.request_timeout)?;
        Ok(Self::new(Arc::new(source), RetryPolicy::from_settings(settings)))
    }

    /// Fetch raw bytes, retrying transient failures
    pub async fn fetch(&self) -> Result<Vec<u8>> {
        let source = self.source.clone();
        let bytes = retry_with_backoff(
            &self.retry,
            || {
                let source = source.clone();
                async move { source.fetch().await }
            },
            |err| err.is_transient(),
        )
        .await?;
        Ok(bytes)
    }

    /// Decode and clean a payload into a table
    pub fn parse(bytes: &[u8]) -> Result<(SalesTable, CleaningReport)> {
        let df = decode_arrow(bytes)?;
        build_table(&df)
    }
}

#[async_trait]
impl TableLoader for IngestionPipeline {
    async fn load(&self) -> Result<LoadedTable> {
        info!("Loading sales snapshot from {}", self.source.describe());

        let bytes = self.fetch().await?;
        let (table, report) = tokio::task::spawn_blocking(move || Self::parse(&bytes))
            .await
            .map_err(|e| SalesError::Internal(format!("Snapshot parsing task failed: {}", e)))??;

        info!(
            "Loaded {} sales rows ({} dropped)",
            table.len(),
            report.dropped_rows
        );
        Ok(LoadedTable::new(table))
    }
}
