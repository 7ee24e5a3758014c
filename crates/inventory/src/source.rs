use async_trait::async_trait;
use stocksync_core::VendorRecord;

use crate::errors::InventoryError;

/// Where vendor records come from.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Fetch the current vendor records, in feed order.
    async fn fetch_vendor_records(&self) -> Result<Vec<VendorRecord>, InventoryError>;
}
