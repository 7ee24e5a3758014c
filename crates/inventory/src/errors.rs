//! Error types for fetching and reading the vendor inventory.

use stocksync_core::FailureKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Inventory download timed out: {url}")]
    Timeout { url: String },

    #[error("Inventory host unreachable: {url} - {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Inventory download failed: {0}")]
    Download(String),

    #[error("Invalid inventory archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Inventory archive has no entry '{0}'")]
    MissingEntry(String),

    #[error("Failed to read inventory spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Inventory spreadsheet has no column '{column}' in header row {row}")]
    MissingColumn { column: String, row: usize },

    #[error("Inventory workbook has no worksheets")]
    EmptyWorkbook,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InventoryError {
    pub fn from_transport(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::Connection {
                url: url.to_string(),
                source: error,
            }
        } else {
            Self::Download(error.to_string())
        }
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Timeout { .. } => FailureKind::NetworkTimeout,
            Self::Connection { .. } => FailureKind::ConnectionFailure,
            _ => FailureKind::Unclassified,
        }
    }
}
