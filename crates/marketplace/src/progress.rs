//! Progress reporting for platform sync runs.
//!
//! This module defines the phases a platform run goes through and the trait
//! callers implement to observe them.

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::models::SyncResult;

/// Phase of a platform run.
///
/// A run moves through the phases in declaration order and ends in `Done`,
/// or in `Failed` as soon as any step errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    FetchOfferIds,
    ReconcileStock,
    PushStockBatches,
    ReconcilePrice,
    PushPriceBatches,
    Done,
    Failed,
}

impl std::fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncPhase::FetchOfferIds => write!(f, "fetch_offer_ids"),
            SyncPhase::ReconcileStock => write!(f, "reconcile_stock"),
            SyncPhase::PushStockBatches => write!(f, "push_stock_batches"),
            SyncPhase::ReconcilePrice => write!(f, "reconcile_price"),
            SyncPhase::PushPriceBatches => write!(f, "push_price_batches"),
            SyncPhase::Done => write!(f, "done"),
            SyncPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Payload for sync progress events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgressPayload {
    /// Platform being synced
    pub platform: String,
    /// Current phase
    pub phase: SyncPhase,
    /// 1-based index of the batch just pushed, during push phases
    pub batch: Option<usize>,
    /// Number of batches in the current push phase
    pub batches_total: Option<usize>,
    /// Items handled so far in the current phase
    pub items: usize,
    /// Optional status message
    pub message: Option<String>,
}

impl SyncProgressPayload {
    /// Create a new progress payload.
    pub fn new(platform: impl Into<String>, phase: SyncPhase) -> Self {
        Self {
            platform: platform.into(),
            phase,
            batch: None,
            batches_total: None,
            items: 0,
            message: None,
        }
    }

    /// Set the batch position.
    pub fn with_batch(mut self, batch: usize, batches_total: usize) -> Self {
        self.batch = Some(batch);
        self.batches_total = Some(batches_total);
        self
    }

    /// Set the items count.
    pub fn with_items(mut self, items: usize) -> Self {
        self.items = items;
        self
    }

    /// Set an optional message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Trait for reporting sync progress.
pub trait SyncProgressReporter: Send + Sync {
    /// Report progress within a platform run.
    fn report_progress(&self, payload: SyncProgressPayload);

    /// Report that a platform run is starting.
    fn report_sync_start(&self, platform: &str);

    /// Report that a platform run completed (successfully or with errors).
    fn report_sync_complete(&self, result: &SyncResult);
}

/// A no-op progress reporter for contexts where progress reporting is not needed.
#[derive(Debug, Clone, Default)]
pub struct NoOpProgressReporter;

impl SyncProgressReporter for NoOpProgressReporter {
    fn report_progress(&self, _payload: SyncProgressPayload) {
        // No-op
    }

    fn report_sync_start(&self, _platform: &str) {
        // No-op
    }

    fn report_sync_complete(&self, _result: &SyncResult) {
        // No-op
    }
}

/// Writes every event to the log.
#[derive(Debug, Clone, Default)]
pub struct LogProgressReporter;

impl SyncProgressReporter for LogProgressReporter {
    fn report_progress(&self, payload: SyncProgressPayload) {
        match (payload.batch, payload.batches_total) {
            (Some(batch), Some(total)) => info!(
                "[{}] {}: batch {}/{} ({} items)",
                payload.platform, payload.phase, batch, total, payload.items
            ),
            _ => info!(
                "[{}] {}: {} items{}",
                payload.platform,
                payload.phase,
                payload.items,
                payload
                    .message
                    .map(|m| format!(" - {}", m))
                    .unwrap_or_default()
            ),
        }
    }

    fn report_sync_start(&self, platform: &str) {
        info!("[{}] Sync started", platform);
    }

    fn report_sync_complete(&self, result: &SyncResult) {
        if result.success {
            info!("[{}] {}", result.platform, result.message);
        } else {
            error!("[{}] Sync failed: {}", result.platform, result.message);
        }
    }
}
