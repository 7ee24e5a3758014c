//! Stocksync Core - Vendor inventory reconciliation.
//!
//! This crate contains the pure reconciliation logic: normalizing the
//! vendor's quantity and price cells, matching vendor records against a
//! marketplace's offer ids, and splitting the resulting updates into
//! request-sized batches. It performs no I/O; marketplace clients and the
//! inventory download live in sibling crates.

pub mod batch;
pub mod constants;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod reconcile;

pub use batch::{batches, BatchLimits};
pub use models::{OfferId, OfferIdSet, PriceUpdate, RawValue, StockUpdate, VendorRecord};
pub use normalize::{normalize_price, normalize_quantity};
pub use reconcile::{non_empty, reconcile_prices, reconcile_stocks};

// Re-export error types
pub use errors::Error;
pub use errors::FailureKind;
pub use errors::Result;
