//! Stocksync Inventory - Vendor stock feed.
//!
//! Downloads the vendor's zipped spreadsheet and turns its rows into
//! [`VendorRecord`](stocksync_core::VendorRecord)s.

pub mod archive;
pub mod errors;
pub mod source;
pub mod spreadsheet;

pub use archive::{ArchiveInventorySource, DEFAULT_INVENTORY_URL, INVENTORY_ENTRY_NAME};
pub use errors::InventoryError;
pub use source::InventorySource;
pub use spreadsheet::{records_from_range, SheetLayout};
