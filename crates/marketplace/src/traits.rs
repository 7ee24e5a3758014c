//! Traits defining the contract between the orchestrator and a platform.

use async_trait::async_trait;
use stocksync_core::{BatchLimits, PriceUpdate, StockUpdate};

use crate::errors::MarketplaceError;
use crate::models::OfferPage;

/// Trait for a marketplace seller API.
///
/// Implement this trait to add a new platform. The orchestrator only ever
/// calls these methods sequentially, awaiting each one.
#[async_trait]
pub trait MarketplaceClient: Send + Sync {
    /// Name used in logs, errors and reports (e.g. "ozon").
    fn platform(&self) -> &str;

    /// Maximum items per stock and per price request.
    fn batch_limits(&self) -> BatchLimits;

    /// Currency code the platform expects on price updates.
    fn currency(&self) -> &str;

    /// Warehouse stock updates are attributed to, if the platform needs one.
    fn warehouse_id(&self) -> Option<&str> {
        None
    }

    /// Fetch one page of listed offers.
    ///
    /// `continuation` is `None` for the first page and the previous page's
    /// `next_token` afterwards.
    async fn list_offers(&self, continuation: Option<&str>) -> Result<OfferPage, MarketplaceError>;

    /// Push one batch of stock updates.
    async fn push_stock_updates(&self, batch: &[StockUpdate]) -> Result<(), MarketplaceError>;

    /// Push one batch of price updates.
    async fn push_price_updates(&self, batch: &[PriceUpdate]) -> Result<(), MarketplaceError>;
}
