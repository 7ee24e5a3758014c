//! Core error types for reconciliation.
//!
//! This module provides:
//! - [`Error`]: contract violations raised by the pure functions of this crate
//! - [`FailureKind`]: how a failure is reported at the top of a sync run
//!
//! Core errors are never caught inside the crate; the orchestrator decides
//! what a failure means for the run.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for normalization, batching and reconciliation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The quantity cell is neither a known sentinel nor a non-negative integer.
    #[error("Invalid quantity: '{0}'")]
    InvalidQuantity(String),

    /// The price cell has no digits before the decimal point, or too many.
    #[error("Invalid price: '{0}'")]
    InvalidPrice(String),

    /// A caller passed an argument outside the function's contract.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Contract violations are never network conditions.
    pub fn failure_kind(&self) -> FailureKind {
        FailureKind::Unclassified
    }
}

/// Classification of a failed platform run, as reported to the operator.
///
/// Timeouts and connection failures are surfaced distinctly so they can be
/// told apart from bad data or API rejections.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The remote side did not answer within the request timeout.
    NetworkTimeout,
    /// The connection could not be established or was dropped.
    ConnectionFailure,
    /// Anything else: API rejections, malformed payloads, bad vendor data.
    Unclassified,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NetworkTimeout => write!(f, "network_timeout"),
            FailureKind::ConnectionFailure => write!(f, "connection_failure"),
            FailureKind::Unclassified => write!(f, "unclassified"),
        }
    }
}
