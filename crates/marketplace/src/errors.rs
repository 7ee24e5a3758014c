//! Error types for marketplace API calls and sync runs.
//!
//! Each variant maps to a [`FailureKind`] via
//! [`failure_kind`](MarketplaceError::failure_kind), which decides how the
//! failure is reported once a platform run has been aborted.

use stocksync_core::FailureKind;
use thiserror::Error;

/// Errors that can occur while talking to a marketplace.
#[derive(Error, Debug)]
pub enum MarketplaceError {
    /// The request did not complete within the client timeout.
    #[error("Timeout: {platform}")]
    Timeout {
        /// The platform that timed out
        platform: String,
    },

    /// The connection to the platform could not be established.
    #[error("Connection failed: {platform} - {source}")]
    Connection {
        /// The platform that could not be reached
        platform: String,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Any other transport-level failure (TLS, redirect loop, body read).
    #[error("Request failed: {platform} - {message}")]
    Request { platform: String, message: String },

    /// The platform answered with a non-success status.
    #[error("API error: {platform} - HTTP {status}: {message}")]
    Api {
        platform: String,
        status: u16,
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to parse response: {platform} - {message}")]
    Decode { platform: String, message: String },

    /// Credentials could not be turned into request headers.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// A counted listing returned an empty page before reaching its total.
    #[error("Pagination stuck: {platform} returned an empty page after {fetched} of {total} offers")]
    PaginationStuck {
        platform: String,
        fetched: usize,
        total: usize,
    },

    /// The listing kept returning continuation tokens past the page limit.
    #[error("Pagination exceeded max pages ({max_pages}): {platform}")]
    PageLimitExceeded { platform: String, max_pages: usize },

    /// Reconciliation or batching rejected the data.
    #[error(transparent)]
    Core(#[from] stocksync_core::Error),
}

impl MarketplaceError {
    /// Classifies a transport error raised by `reqwest`.
    pub fn from_transport(platform: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                platform: platform.to_string(),
            }
        } else if error.is_connect() {
            Self::Connection {
                platform: platform.to_string(),
                source: error,
            }
        } else {
            Self::Request {
                platform: platform.to_string(),
                message: error.to_string(),
            }
        }
    }

    /// Returns how this failure should be reported.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Timeout { .. } => FailureKind::NetworkTimeout,
            Self::Connection { .. } => FailureKind::ConnectionFailure,
            Self::Core(err) => err.failure_kind(),
            Self::Request { .. }
            | Self::Api { .. }
            | Self::Decode { .. }
            | Self::InvalidCredentials(_)
            | Self::PaginationStuck { .. }
            | Self::PageLimitExceeded { .. } => FailureKind::Unclassified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_network_timeout() {
        let error = MarketplaceError::Timeout {
            platform: "ozon".to_string(),
        };
        assert_eq!(error.failure_kind(), FailureKind::NetworkTimeout);
    }

    #[test]
    fn test_api_error_is_unclassified() {
        let error = MarketplaceError::Api {
            platform: "ozon".to_string(),
            status: 403,
            message: "Client-Id and Api-Key headers are required".to_string(),
        };
        assert_eq!(error.failure_kind(), FailureKind::Unclassified);
    }

    #[test]
    fn test_core_error_is_unclassified() {
        let error: MarketplaceError =
            stocksync_core::Error::InvalidQuantity("abc".to_string()).into();
        assert_eq!(error.failure_kind(), FailureKind::Unclassified);
        assert_eq!(format!("{}", error), "Invalid quantity: 'abc'");
    }

    #[test]
    fn test_pagination_errors_are_unclassified() {
        let error = MarketplaceError::PaginationStuck {
            platform: "ozon".to_string(),
            fetched: 3,
            total: 5,
        };
        assert_eq!(error.failure_kind(), FailureKind::Unclassified);

        let error = MarketplaceError::PageLimitExceeded {
            platform: "yandex_market:1".to_string(),
            max_pages: 2,
        };
        assert_eq!(error.failure_kind(), FailureKind::Unclassified);
    }

    #[test]
    fn test_error_display() {
        let error = MarketplaceError::Api {
            platform: "yandex_market:42".to_string(),
            status: 401,
            message: "OAuth credentials are not specified".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "API error: yandex_market:42 - HTTP 401: OAuth credentials are not specified"
        );
    }
}
