//! Request plumbing shared by the marketplace clients.

use std::time::Duration;

use log::debug;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;

use crate::errors::MarketplaceError;

/// Default timeout for API requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error bodies of both platforms, parsed leniently for a better message.
///
/// The seller API answers `{"code": 16, "message": "..."}`, the market API
/// `{"errors": [{"code": "...", "message": "..."}], "status": "ERROR"}`.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiErrorResponse {
    fn into_message(self) -> Option<String> {
        if let Some(message) = self.message.or(self.error) {
            return Some(message);
        }
        let details: Vec<String> = self
            .errors
            .into_iter()
            .filter_map(|e| match (e.code, e.message) {
                (Some(code), Some(message)) => Some(format!("{}: {}", code, message)),
                (code, message) => code.or(message),
            })
            .collect();
        if details.is_empty() {
            None
        } else {
            Some(details.join("; "))
        }
    }
}

pub(crate) fn build_client(
    platform: &str,
    timeout: Duration,
) -> Result<reqwest::Client, MarketplaceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| MarketplaceError::Request {
            platform: platform.to_string(),
            message: format!("Failed to initialize HTTP client: {}", e),
        })
}

pub(crate) fn header_value(name: &str, value: &str) -> Result<HeaderValue, MarketplaceError> {
    HeaderValue::from_str(value)
        .map_err(|e| MarketplaceError::InvalidCredentials(format!("{}: {}", name, e)))
}

/// Sends a request and parses the JSON body, handling errors appropriately.
pub(crate) async fn send_json<T: DeserializeOwned>(
    platform: &str,
    request: reqwest::RequestBuilder,
) -> Result<T, MarketplaceError> {
    let response = request
        .send()
        .await
        .map_err(|e| MarketplaceError::from_transport(platform, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| MarketplaceError::from_transport(platform, e))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .ok()
            .and_then(ApiErrorResponse::into_message)
            .unwrap_or_else(|| body.chars().take(200).collect());
        debug!("[{}] HTTP {} error body: {}", platform, status, body);
        return Err(MarketplaceError::Api {
            platform: platform.to_string(),
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| MarketplaceError::Decode {
        platform: platform.to_string(),
        message: format!("{} - {}", e, body.chars().take(200).collect::<String>()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seller_error_message() {
        let err: ApiErrorResponse = serde_json::from_str(
            r#"{"code":16,"message":"Client-Id and Api-Key headers are required"}"#,
        )
        .unwrap();
        assert_eq!(
            err.into_message().as_deref(),
            Some("Client-Id and Api-Key headers are required")
        );
    }

    #[test]
    fn test_market_error_message() {
        let err: ApiErrorResponse = serde_json::from_str(
            r#"{"errors":[{"code":"UNAUTHORIZED","message":"OAuth credentials are not specified"}],"status":"ERROR"}"#,
        )
        .unwrap();
        assert_eq!(
            err.into_message().as_deref(),
            Some("UNAUTHORIZED: OAuth credentials are not specified")
        );
    }

    #[test]
    fn test_empty_error_body_has_no_message() {
        let err: ApiErrorResponse = serde_json::from_str("{}").unwrap();
        assert!(err.into_message().is_none());
    }

    #[test]
    fn test_header_value_rejects_control_characters() {
        let err = header_value("Api-Key", "bad\nkey").unwrap_err();
        assert!(matches!(err, MarketplaceError::InvalidCredentials(_)));
    }
}
