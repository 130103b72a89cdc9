//! Batch loading with primary-key deduplication

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::LoaderError;
use crate::models::{OrderRecord, OrderRow};
use crate::store::OrderStore;

/// Statistics from a load run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    /// Records in the input batch
    pub total_records: usize,
    /// Rows inserted by this run
    pub processed_count: usize,
    /// Records skipped because their order_id was already stored
    pub skipped_duplicates: usize,
    /// Duration of the load
    #[serde(skip)]
    pub duration: Duration,
}

impl LoadStats {
    /// Format duration as human-readable string
    pub fn duration_string(&self) -> String {
        let millis = self.duration.as_millis();
        if millis < 1000 {
            format!("{}ms", millis)
        } else {
            let secs = self.duration.as_secs();
            if secs < 60 {
                format!("{:.1}s", self.duration.as_secs_f64())
            } else {
                format!("{}m {}s", secs / 60, secs % 60)
            }
        }
    }
}

/// Loads a parsed batch into a store inside one transaction.
///
/// Existing order ids are skipped, never updated. Any error rolls the whole
/// batch back, so a failed run leaves the table as it was.
pub struct OrderLoader<'a, S: OrderStore + ?Sized> {
    store: &'a mut S,
    progress_interval: usize,
}

impl<'a, S: OrderStore + ?Sized> OrderLoader<'a, S> {
    /// Create a loader logging progress every `progress_interval` inserts (0 disables)
    pub fn new(store: &'a mut S, progress_interval: usize) -> Self {
        Self {
            store,
            progress_interval,
        }
    }

    /// Whether this order id is already stored (including earlier rows of
    /// the current, uncommitted batch)
    pub fn is_duplicate(&mut self, order_id: &str) -> Result<bool, LoaderError> {
        self.store.order_exists(order_id)
    }

    /// Load every record in input order and commit once at the end
    pub fn load_all(&mut self, records: &[OrderRecord]) -> Result<LoadStats, LoaderError> {
        let started = Instant::now();
        let mut stats = LoadStats {
            total_records: records.len(),
            ..Default::default()
        };

        self.store.begin().inspect_err(|e| {
            tracing::error!("Error processing and saving data: {}", e);
        })?;

        let result = self
            .load_records(records, &mut stats)
            .and_then(|()| self.store.commit());

        if let Err(e) = result {
            tracing::error!("Error processing and saving data: {}", e);
            if let Err(rollback_err) = self.store.rollback() {
                tracing::error!("Rollback failed: {}", rollback_err);
            }
            return Err(e);
        }

        stats.duration = started.elapsed();
        tracing::info!(
            "Data successfully loaded into DB. Processed records: {}. Skipped duplicates: {}",
            stats.processed_count,
            stats.skipped_duplicates
        );
        Ok(stats)
    }

    fn load_records(
        &mut self,
        records: &[OrderRecord],
        stats: &mut LoadStats,
    ) -> Result<(), LoaderError> {
        for (index, record) in records.iter().enumerate() {
            let order_id = record
                .order_id
                .as_deref()
                .ok_or(LoaderError::MissingOrderId { index })?;

            if self.is_duplicate(order_id)? {
                tracing::info!("Order with ID {} already exists in DB. Skipping.", order_id);
                stats.skipped_duplicates += 1;
                continue;
            }

            let row = OrderRow::from_record(index, record)?;
            self.store.insert_order(&row)?;
            stats.processed_count += 1;

            if self.progress_interval > 0 && stats.processed_count % self.progress_interval == 0 {
                tracing::info!("Processed {} records", stats.processed_count);
            }
        }
        Ok(())
    }
}
