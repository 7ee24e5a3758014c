//! Per-platform stock and price sync orchestrator.
//!
//! A platform run walks through the phases of [`SyncPhase`]:
//! fetch offer ids → reconcile stock → push stock batches →
//! reconcile prices → push price batches. Any failing step aborts the run for
//! that platform; batches already pushed stay applied.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info, warn};
use stocksync_core::{
    batches, non_empty, reconcile_prices, reconcile_stocks, FailureKind, OfferIdSet, VendorRecord,
};

use crate::errors::MarketplaceError;
use crate::models::{
    PlatformOutcome, PlatformSyncReport, PriceSyncOutcome, StockSyncOutcome, SyncResult,
};
use crate::progress::{SyncPhase, SyncProgressPayload, SyncProgressReporter};
use crate::traits::MarketplaceClient;

/// Configuration for sync operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Maximum number of listing pages to fetch per platform (safety limit).
    pub max_pages: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { max_pages: 10_000 }
    }
}

/// Offer ids fetched from a platform listing.
#[derive(Debug, Clone, Default)]
pub struct FetchedOffers {
    pub offer_ids: OfferIdSet,
    pub pages: usize,
}

/// Orchestrates stock and price synchronization for marketplace platforms.
///
/// # Example
///
/// ```ignore
/// let orchestrator = SyncOrchestrator::new(Arc::new(LogProgressReporter), SyncConfig::default());
/// let report = orchestrator.run(&ozon_client, &vendor_records).await?;
/// ```
pub struct SyncOrchestrator<P: SyncProgressReporter> {
    progress_reporter: Arc<P>,
    config: SyncConfig,
}

impl<P: SyncProgressReporter> SyncOrchestrator<P> {
    /// Create a new sync orchestrator.
    pub fn new(progress_reporter: Arc<P>, config: SyncConfig) -> Self {
        Self {
            progress_reporter,
            config,
        }
    }

    /// Run every platform in turn against the same vendor records.
    ///
    /// Platforms share nothing: each fetches its own offer ids. A failing
    /// platform is logged with its failure kind and does not stop the others.
    pub async fn run_all(
        &self,
        clients: &[Arc<dyn MarketplaceClient>],
        records: &[VendorRecord],
    ) -> Vec<PlatformOutcome> {
        let mut outcomes = Vec::with_capacity(clients.len());

        for client in clients {
            let platform = client.platform().to_string();
            let result = self.run(client.as_ref(), records).await;

            if let Err(err) = &result {
                match err.failure_kind() {
                    FailureKind::NetworkTimeout => {
                        error!("[{}] Request timed out, run aborted: {}", platform, err)
                    }
                    FailureKind::ConnectionFailure => {
                        error!("[{}] Connection error, run aborted: {}", platform, err)
                    }
                    FailureKind::Unclassified => {
                        error!("[{}] Run aborted: {}", platform, err)
                    }
                }
            }

            outcomes.push(PlatformOutcome { platform, result });
        }

        outcomes
    }

    /// Perform a full platform run: offer ids -> stocks -> prices.
    ///
    /// Always emits sync-start and sync-complete events.
    pub async fn run(
        &self,
        client: &dyn MarketplaceClient,
        records: &[VendorRecord],
    ) -> Result<PlatformSyncReport, MarketplaceError> {
        let platform = client.platform();
        info!("[{}] Starting stock and price sync...", platform);
        self.progress_reporter.report_sync_start(platform);

        let result = self.run_internal(client, records).await;

        let sync_result = match &result {
            Ok(report) => SyncResult {
                platform: platform.to_string(),
                success: true,
                message: format!(
                    "Sync completed. {} stock updates ({} available) in {} batches, \
                     {} price updates in {} batches.",
                    report.stock.updates.len(),
                    report.stock.available.len(),
                    report.stock.batches,
                    report.price.updates.len(),
                    report.price.batches
                ),
            },
            Err(err) => {
                self.progress_reporter.report_progress(
                    SyncProgressPayload::new(platform, SyncPhase::Failed)
                        .with_message(err.to_string()),
                );
                SyncResult {
                    platform: platform.to_string(),
                    success: false,
                    message: err.to_string(),
                }
            }
        };
        self.progress_reporter.report_sync_complete(&sync_result);

        result
    }

    /// Internal run logic that may fail at any step.
    async fn run_internal(
        &self,
        client: &dyn MarketplaceClient,
        records: &[VendorRecord],
    ) -> Result<PlatformSyncReport, MarketplaceError> {
        let fetched = self.fetch_offer_ids(client).await?;
        let stock = self.push_stocks(client, records, &fetched.offer_ids).await?;
        let price = self.push_prices(client, records, &fetched.offer_ids).await?;

        self.progress_reporter.report_progress(
            SyncProgressPayload::new(client.platform(), SyncPhase::Done)
                .with_items(stock.updates.len() + price.updates.len()),
        );

        Ok(PlatformSyncReport {
            platform: client.platform().to_string(),
            offers_fetched: fetched.offer_ids.len(),
            pages_fetched: fetched.pages,
            stock,
            price,
        })
    }

    /// Fetch the platform's offer ids and push stock updates only.
    pub async fn sync_stocks(
        &self,
        client: &dyn MarketplaceClient,
        records: &[VendorRecord],
    ) -> Result<StockSyncOutcome, MarketplaceError> {
        let fetched = self.fetch_offer_ids(client).await?;
        self.push_stocks(client, records, &fetched.offer_ids).await
    }

    /// Fetch the platform's offer ids and push price updates only.
    pub async fn sync_prices(
        &self,
        client: &dyn MarketplaceClient,
        records: &[VendorRecord],
    ) -> Result<PriceSyncOutcome, MarketplaceError> {
        let fetched = self.fetch_offer_ids(client).await?;
        self.push_prices(client, records, &fetched.offer_ids).await
    }

    /// Page through the platform's listing until it reports the end.
    pub async fn fetch_offer_ids(
        &self,
        client: &dyn MarketplaceClient,
    ) -> Result<FetchedOffers, MarketplaceError> {
        let platform = client.platform();
        let mut offer_ids = OfferIdSet::new();
        let mut continuation: Option<String> = None;
        let mut pages: usize = 0;
        let mut items_seen: usize = 0;

        loop {
            if pages >= self.config.max_pages {
                return Err(MarketplaceError::PageLimitExceeded {
                    platform: platform.to_string(),
                    max_pages: self.config.max_pages,
                });
            }

            let page = client.list_offers(continuation.as_deref()).await?;
            pages += 1;
            let page_len = page.offer_ids.len();
            items_seen += page_len;
            offer_ids.extend(page.offer_ids);

            debug!(
                "[{}] Fetched page {} with {} offers (total {:?})",
                platform, pages, page_len, page.total
            );
            self.progress_reporter.report_progress(
                SyncProgressPayload::new(platform, SyncPhase::FetchOfferIds)
                    .with_items(offer_ids.len())
                    .with_message(format!("page {}", pages)),
            );

            let finished = match page.total {
                Some(total) => {
                    if items_seen >= total {
                        true
                    } else if page_len == 0 {
                        return Err(MarketplaceError::PaginationStuck {
                            platform: platform.to_string(),
                            fetched: items_seen,
                            total,
                        });
                    } else {
                        false
                    }
                }
                None => page.next_token.as_deref().map_or(true, str::is_empty),
            };

            if finished {
                break;
            }
            continuation = page.next_token;
        }

        if items_seen != offer_ids.len() {
            warn!(
                "[{}] Listing returned {} duplicate offer ids",
                platform,
                items_seen - offer_ids.len()
            );
        }
        info!(
            "[{}] Found {} listed offers in {} pages",
            platform,
            offer_ids.len(),
            pages
        );

        Ok(FetchedOffers { offer_ids, pages })
    }

    async fn push_stocks(
        &self,
        client: &dyn MarketplaceClient,
        records: &[VendorRecord],
        offer_ids: &OfferIdSet,
    ) -> Result<StockSyncOutcome, MarketplaceError> {
        let platform = client.platform();

        self.progress_reporter
            .report_progress(SyncProgressPayload::new(platform, SyncPhase::ReconcileStock));
        let updates =
            reconcile_stocks(records, offer_ids, client.warehouse_id(), Some(Utc::now()))?;
        let available = non_empty(&updates);
        info!(
            "[{}] Reconciled {} stock updates ({} available)",
            platform,
            updates.len(),
            available.len()
        );

        let limit = client.batch_limits().stock;
        let chunks = batches(&updates, limit)?;
        let total = updates.len().div_ceil(limit);
        let mut pushed = 0;

        for (index, chunk) in chunks.enumerate() {
            client.push_stock_updates(chunk).await?;
            pushed += chunk.len();
            self.progress_reporter.report_progress(
                SyncProgressPayload::new(platform, SyncPhase::PushStockBatches)
                    .with_batch(index + 1, total)
                    .with_items(pushed),
            );
        }

        Ok(StockSyncOutcome {
            updates,
            available,
            batches: total,
        })
    }

    async fn push_prices(
        &self,
        client: &dyn MarketplaceClient,
        records: &[VendorRecord],
        offer_ids: &OfferIdSet,
    ) -> Result<PriceSyncOutcome, MarketplaceError> {
        let platform = client.platform();

        self.progress_reporter
            .report_progress(SyncProgressPayload::new(platform, SyncPhase::ReconcilePrice));
        let updates = reconcile_prices(records, offer_ids, client.currency())?;
        info!("[{}] Reconciled {} price updates", platform, updates.len());

        let limit = client.batch_limits().price;
        let chunks = batches(&updates, limit)?;
        let total = updates.len().div_ceil(limit);
        let mut pushed = 0;

        for (index, chunk) in chunks.enumerate() {
            client.push_price_updates(chunk).await?;
            pushed += chunk.len();
            self.progress_reporter.report_progress(
                SyncProgressPayload::new(platform, SyncPhase::PushPriceBatches)
                    .with_batch(index + 1, total)
                    .with_items(pushed),
            );
        }

        Ok(PriceSyncOutcome {
            updates,
            batches: total,
        })
    }
}
