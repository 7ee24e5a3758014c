//! Vendor feed published as a zipped `.xls` workbook.
//!
//! The archive is downloaded and unpacked in memory; nothing touches disk.

use std::io::{Cursor, Read};
use std::time::Duration;

use async_trait::async_trait;
use calamine::{open_workbook_auto_from_rs, Reader};
use log::{debug, info};
use reqwest::Client;
use stocksync_core::VendorRecord;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::errors::InventoryError;
use crate::source::InventorySource;
use crate::spreadsheet::{records_from_range, SheetLayout};

/// Where the vendor publishes its stock list.
pub const DEFAULT_INVENTORY_URL: &str = "https://timeworld.ru/upload/files/ostatki.zip";

/// Workbook file inside the archive.
pub const INVENTORY_ENTRY_NAME: &str = "ostatki.xls";

/// Downloads a zip archive and reads the first worksheet of one workbook in it.
pub struct ArchiveInventorySource {
    client: Client,
    url: String,
    entry_name: String,
    layout: SheetLayout,
}

impl ArchiveInventorySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, InventoryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                InventoryError::Download(format!("Failed to initialize HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            url: url.into(),
            entry_name: INVENTORY_ENTRY_NAME.to_string(),
            layout: SheetLayout::default(),
        })
    }

    pub fn with_entry_name(mut self, entry_name: impl Into<String>) -> Self {
        self.entry_name = entry_name.into();
        self
    }

    pub fn with_layout(mut self, layout: SheetLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn download(&self) -> Result<Vec<u8>, InventoryError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| InventoryError::from_transport(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::Download(format!(
                "{} returned HTTP {}",
                self.url, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| InventoryError::from_transport(&self.url, e))?;
        debug!("[Inventory] Downloaded {} bytes from {}", bytes.len(), self.url);
        Ok(bytes.to_vec())
    }
}

/// Extracts `entry_name` from a zip archive held in memory.
pub fn extract_entry(archive_bytes: Vec<u8>, entry_name: &str) -> Result<Vec<u8>, InventoryError> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))?;
    let mut entry = match archive.by_name(entry_name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(InventoryError::MissingEntry(entry_name.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let mut contents = Vec::new();
    entry.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Reads vendor records from the first worksheet of a workbook.
pub fn read_workbook(
    workbook_bytes: Vec<u8>,
    layout: &SheetLayout,
) -> Result<Vec<VendorRecord>, InventoryError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(workbook_bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(InventoryError::EmptyWorkbook)??;
    records_from_range(&range, layout)
}

#[async_trait]
impl InventorySource for ArchiveInventorySource {
    async fn fetch_vendor_records(&self) -> Result<Vec<VendorRecord>, InventoryError> {
        info!("[Inventory] Fetching vendor inventory from {}", self.url);
        let archive = self.download().await?;
        let workbook = extract_entry(archive, &self.entry_name)?;
        let records = read_workbook(workbook, &self.layout)?;
        info!("[Inventory] Loaded {} vendor records", records.len());
        Ok(records)
    }
}
