//! Results exchanged between the clients, the orchestrator and its callers.

use serde::{Deserialize, Serialize};
use stocksync_core::{OfferId, PriceUpdate, StockUpdate};

use crate::errors::MarketplaceError;

/// One page of a platform's listing endpoint.
///
/// Platforms end pagination in one of two ways: by reporting a `total` that
/// the accumulated item count must reach, or by omitting `next_token`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferPage {
    pub offer_ids: Vec<OfferId>,
    /// Token to pass to the next `list_offers` call
    pub next_token: Option<String>,
    /// Total number of listed offers, for platforms paged by count
    pub total: Option<usize>,
}

/// Outcome of the stock phase of a platform run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSyncOutcome {
    /// Every update pushed, matched and zeroed
    pub updates: Vec<StockUpdate>,
    /// The pushed updates with a non-zero quantity
    pub available: Vec<StockUpdate>,
    pub batches: usize,
}

/// Outcome of the price phase of a platform run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSyncOutcome {
    pub updates: Vec<PriceUpdate>,
    pub batches: usize,
}

/// Everything a successful platform run did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSyncReport {
    pub platform: String,
    pub offers_fetched: usize,
    pub pages_fetched: usize,
    pub stock: StockSyncOutcome,
    pub price: PriceSyncOutcome,
}

/// Summary emitted to progress reporters when a platform run ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub platform: String,
    pub success: bool,
    pub message: String,
}

/// Result of one platform inside a multi-platform run.
#[derive(Debug)]
pub struct PlatformOutcome {
    pub platform: String,
    pub result: Result<PlatformSyncReport, MarketplaceError>,
}

impl PlatformOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
