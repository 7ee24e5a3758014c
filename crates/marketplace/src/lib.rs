//! Stocksync Marketplace - Seller platform clients and sync orchestration.
//!
//! This crate provides REST clients for the marketplace seller APIs and the
//! orchestrator that pushes reconciled stock and prices to them.

pub mod errors;
mod http;
pub mod models;
pub mod orchestrator;
pub mod ozon;
pub mod progress;
pub mod traits;
pub mod yandex_market;

// Re-export commonly used types
pub use errors::MarketplaceError;
pub use http::DEFAULT_REQUEST_TIMEOUT;
pub use models::{
    OfferPage, PlatformOutcome, PlatformSyncReport, PriceSyncOutcome, StockSyncOutcome, SyncResult,
};
pub use orchestrator::{SyncConfig, SyncOrchestrator};
pub use ozon::{OzonSellerClient, DEFAULT_OZON_API_URL, OZON_BATCH_LIMITS};
pub use progress::{
    LogProgressReporter, NoOpProgressReporter, SyncPhase, SyncProgressPayload,
    SyncProgressReporter,
};
pub use traits::MarketplaceClient;
pub use yandex_market::{
    YandexMarketClient, DEFAULT_YANDEX_MARKET_API_URL, YANDEX_MARKET_BATCH_LIMITS,
};
