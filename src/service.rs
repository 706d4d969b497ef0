//! Sales Service
//!
//! Facade over ingestion, filtering and aggregation. Owns the cached snapshot:
//! - the table is loaded lazily on first use and reused afterwards
//! - a snapshot is published by swapping one `Arc` under a short write lock, so
//!   readers see either the old table or the new one, never a mix
//! - `refresh` replaces the snapshot only when loading succeeds
//! - loads are serialized; concurrent first requests share one load

use crate::analytics::{
    self, CategoryRow, FilterOptions, Overview, ProfitRow, RegionRow, SegmentRow, StateRow,
    TrendRow,
};
use crate::config::Settings;
use crate::error::Result;
use crate::filter::{self, FilterSpec};
use crate::ingestion::{IngestionPipeline, LoadedTable, TableLoader};
use crate::model::{SalesTable, TableView};
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{error, info};

/// A published table together with values derived once per load
#[derive(Debug)]
pub struct CachedSnapshot {
    pub table: SalesTable,
    pub filter_options: FilterOptions,
    pub refreshed_at: DateTime<Utc>,
}

impl CachedSnapshot {
    fn from_loaded(loaded: LoadedTable) -> Self {
        let filter_options = analytics::filter_options(&loaded.table);
        Self {
            table: loaded.table,
            filter_options,
            refreshed_at: loaded.refreshed_at,
        }
    }
}

pub struct SalesService {
    loader: Arc<dyn TableLoader>,
    snapshot: RwLock<Option<Arc<CachedSnapshot>>>,
    load_guard: Mutex<()>,
}

impl SalesService {
    pub fn new(loader: Arc<dyn TableLoader>) -> Self {
        Self {
            loader,
            snapshot: RwLock::new(None),
            load_guard: Mutex::new(()),
        }
    }

    /// Service backed by the HTTP ingestion pipeline described by `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(Arc::new(IngestionPipeline::from_settings(settings)?)))
    }

    /// Currently published snapshot, if any, without triggering a load
    pub fn current(&self) -> Option<Arc<CachedSnapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Timestamp of the last successful load
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.current().map(|s| s.refreshed_at)
    }

    /// Published snapshot, loading it first if nothing is cached yet
    pub async fn snapshot(&self) -> Result<Arc<CachedSnapshot>> {
        if let Some(snapshot) = self.current() {
            return Ok(snapshot);
        }

        let _guard = self.load_guard.lock().await;
        // Another request may have finished loading while we waited
        if let Some(snapshot) = self.current() {
            return Ok(snapshot);
        }

        let loaded = self.loader.load().await?;
        Ok(self.publish(loaded))
    }

    /// Force a reload. On failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<DateTime<Utc>> {
        let _guard = self.load_guard.lock().await;

        match self.loader.load().await {
            Ok(loaded) => Ok(self.publish(loaded).refreshed_at),
            Err(e) => {
                error!("Sales data refresh failed, keeping previous snapshot: {}", e);
                Err(e)
            }
        }
    }

    pub async fn filter_options(&self) -> Result<FilterOptions> {
        Ok(self.snapshot().await?.filter_options.clone())
    }

    pub async fn overview(&self, filter: &FilterSpec) -> Result<Overview> {
        self.with_view(filter, analytics::overview).await
    }

    pub async fn sales_by_category(&self, filter: &FilterSpec) -> Result<Vec<CategoryRow>> {
        self.with_view(filter, analytics::sales_by_category).await
    }

    pub async fn sales_by_region(&self, filter: &FilterSpec) -> Result<Vec<RegionRow>> {
        self.with_view(filter, analytics::sales_by_region).await
    }

    pub async fn sales_trends(&self, filter: &FilterSpec) -> Result<Vec<TrendRow>> {
        self.with_view(filter, analytics::sales_trends).await
    }

    pub async fn profit_analysis(&self, filter: &FilterSpec) -> Result<Vec<ProfitRow>> {
        self.with_view(filter, analytics::profit_analysis).await
    }

    pub async fn segment_analysis(&self, filter: &FilterSpec) -> Result<Vec<SegmentRow>> {
        self.with_view(filter, analytics::segment_analysis).await
    }

    pub async fn state_sales(&self, filter: &FilterSpec) -> Result<Vec<StateRow>> {
        self.with_view(filter, analytics::state_sales).await
    }

    async fn with_view<T, F>(&self, filter: &FilterSpec, compute: F) -> Result<T>
    where
        F: FnOnce(&TableView<'_>) -> T,
    {
        let snapshot = self.snapshot().await?;
        let view = filter::apply(&snapshot.table, filter);
        Ok(compute(&view))
    }

    fn publish(&self, loaded: LoadedTable) -> Arc<CachedSnapshot> {
        let snapshot = Arc::new(CachedSnapshot::from_loaded(loaded));
        info!(
            "Published sales snapshot: {} rows, refreshed at {}",
            snapshot.table.len(),
            snapshot.refreshed_at
        );
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        snapshot
    }
}
