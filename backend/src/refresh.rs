//! Rebuilds the status cache from the workbooks in the data directory.
//!
//! Every run is a full rebuild: list the directory, read each workbook and
//! publish a fresh snapshot. A workbook that cannot be read becomes a failed
//! entry; it never aborts the scan.

use chrono::{Local, NaiveDate};
use fleet_shared::models::{CarRecord, CarStatus, StatusSnapshot};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::cache::StatusCache;
use crate::workbook::{self, SheetDates, SheetError};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("cannot list {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refresh task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Read every eligible workbook in `dir` into a new snapshot.
pub fn scan_directory(dir: &Path, today: NaiveDate) -> Result<StatusSnapshot, RefreshError> {
    let workbooks = workbook::list_workbooks(dir).map_err(|source| RefreshError::Scan {
        path: dir.to_path_buf(),
        source,
    })?;

    let cars: BTreeMap<String, CarStatus> = workbooks
        .into_iter()
        .map(|(name, path)| {
            let status = inspect_workbook(&path, today);
            (name, status)
        })
        .collect();

    Ok(StatusSnapshot::new(cars))
}

/// Derive the status of a single workbook.
pub fn inspect_workbook(path: &Path, today: NaiveDate) -> CarStatus {
    match workbook::read_dates(path) {
        Ok(dates) => CarStatus::Ready(CarRecord::new(
            dates.last_reserved,
            dates.available_again,
            today,
        )),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            CarStatus::Failed(e.to_failure())
        }
    }
}

/// Owns the data directory and serializes every run that publishes to the cache.
#[derive(Debug)]
pub struct RefreshJob {
    data_dir: PathBuf,
    cache: StatusCache,
    // Held for the whole write-and-rescan sequence so runs cannot interleave
    running: Mutex<()>,
}

impl RefreshJob {
    pub fn new(data_dir: impl Into<PathBuf>, cache: StatusCache) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache,
            running: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn cache(&self) -> &StatusCache {
        &self.cache
    }

    /// Rescan the data directory and publish the result.
    ///
    /// On failure the previously published snapshot stays in place.
    pub async fn refresh(&self) -> Result<Arc<StatusSnapshot>, RefreshError> {
        let _running = self.running.lock().await;
        self.rescan().await
    }

    /// Write new dates into `filename`, then rescan.
    ///
    /// Once the write has committed, a failed rescan no longer fails the
    /// update; it is logged and the previous snapshot stays published.
    pub async fn update_dates(
        &self,
        filename: &str,
        dates: SheetDates,
    ) -> Result<Arc<StatusSnapshot>, RefreshError> {
        let _running = self.running.lock().await;

        let path = workbook::resolve(&self.data_dir, filename)?;
        tokio::task::spawn_blocking(move || workbook::write_dates(&path, dates)).await??;
        tracing::info!(
            "Updated {} (last reserved: {:?}, available again: {:?})",
            filename,
            dates.last_reserved,
            dates.available_again
        );

        let rescanned = self.rescan().await;
        Ok(self.settle_update(filename, rescanned))
    }

    fn settle_update(
        &self,
        filename: &str,
        rescanned: Result<Arc<StatusSnapshot>, RefreshError>,
    ) -> Arc<StatusSnapshot> {
        rescanned.unwrap_or_else(|e| {
            tracing::error!("Saved {} but the following refresh failed: {}", filename, e);
            self.cache.snapshot()
        })
    }

    async fn rescan(&self) -> Result<Arc<StatusSnapshot>, RefreshError> {
        let dir = self.data_dir.clone();
        let today = Local::now().date_naive();
        let snapshot =
            tokio::task::spawn_blocking(move || scan_directory(&dir, today)).await??;

        tracing::debug!(
            "Refreshed {} workbooks ({} failed)",
            snapshot.len(),
            snapshot.failed_count()
        );

        Ok(self.cache.publish(snapshot))
    }
}
