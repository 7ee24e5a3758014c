//! Ozon Seller API client.
//!
//! Authenticates with the `Client-Id` / `Api-Key` header pair. The product
//! listing is paged by count: each page reports the total number of listed
//! products and the `last_id` to continue from.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use stocksync_core::{BatchLimits, PriceUpdate, StockUpdate};

use crate::errors::MarketplaceError;
use crate::http::{build_client, header_value, send_json};
use crate::models::OfferPage;
use crate::traits::MarketplaceClient;

/// Production endpoint of the Seller API.
pub const DEFAULT_OZON_API_URL: &str = "https://api-seller.ozon.ru";

/// Request size limits of the stock and price import endpoints.
pub const OZON_BATCH_LIMITS: BatchLimits = BatchLimits {
    stock: 100,
    price: 1000,
};

const PLATFORM: &str = "ozon";
const CURRENCY: &str = "RUB";
const LIST_PAGE_SIZE: usize = 1000;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ProductListRequest<'a> {
    filter: ProductFilter,
    last_id: &'a str,
    limit: usize,
}

#[derive(Debug, Serialize)]
struct ProductFilter {
    visibility: &'static str,
}

#[derive(Debug, Deserialize)]
struct ProductListResponse {
    result: ProductListResult,
}

#[derive(Debug, Deserialize)]
struct ProductListResult {
    #[serde(default)]
    items: Vec<ProductListItem>,
    total: usize,
    #[serde(default)]
    last_id: String,
}

#[derive(Debug, Deserialize)]
struct ProductListItem {
    offer_id: String,
}

#[derive(Debug, Serialize)]
struct StockImportRequest<'a> {
    stocks: Vec<StockItem<'a>>,
}

#[derive(Debug, Serialize)]
struct StockItem<'a> {
    offer_id: &'a str,
    stock: u32,
}

#[derive(Debug, Serialize)]
struct PriceImportRequest<'a> {
    prices: Vec<PriceItem<'a>>,
}

#[derive(Debug, Serialize)]
struct PriceItem<'a> {
    auto_action_enabled: &'static str,
    currency_code: &'a str,
    offer_id: &'a str,
    old_price: &'static str,
    price: String,
}

/// Per-offer results of an import call.
#[derive(Debug, Deserialize)]
struct ImportResponse {
    #[serde(default)]
    result: Vec<ImportResult>,
}

#[derive(Debug, Deserialize)]
struct ImportResult {
    #[serde(default)]
    offer_id: String,
    #[serde(default)]
    updated: bool,
    #[serde(default)]
    errors: Vec<ImportError>,
}

#[derive(Debug, Deserialize)]
struct ImportError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// Client for the Ozon Seller API.
///
/// # Example
///
/// ```ignore
/// let client = OzonSellerClient::new("123456", "api-key", Duration::from_secs(30))?;
/// let page = client.list_offers(None).await?;
/// ```
pub struct OzonSellerClient {
    client: Client,
    base_url: String,
    headers: HeaderMap,
    limits: BatchLimits,
}

impl OzonSellerClient {
    /// Create a client for the given seller credentials.
    pub fn new(
        client_id: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, MarketplaceError> {
        let mut headers = HeaderMap::new();
        headers.insert("Client-Id", header_value("Client-Id", client_id)?);
        headers.insert("Api-Key", header_value("Api-Key", api_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            client: build_client(PLATFORM, timeout)?,
            base_url: DEFAULT_OZON_API_URL.to_string(),
            headers,
            limits: OZON_BATCH_LIMITS,
        })
    }

    /// Point the client at a different endpoint (sandbox, test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_batch_limits(mut self, limits: BatchLimits) -> Self {
        self.limits = limits;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, MarketplaceError> {
        let request = self
            .client
            .post(self.url(path))
            .headers(self.headers.clone())
            .json(body);
        send_json(PLATFORM, request).await
    }

    fn log_rejected(kind: &str, response: ImportResponse) {
        for item in response.result.into_iter().filter(|r| !r.updated) {
            let reasons: Vec<String> = item
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.code, e.message))
                .collect();
            warn!(
                "[SellerApi] {} update rejected for offer '{}': {}",
                kind,
                item.offer_id,
                reasons.join("; ")
            );
        }
    }
}

#[async_trait]
impl MarketplaceClient for OzonSellerClient {
    fn platform(&self) -> &str {
        PLATFORM
    }

    fn batch_limits(&self) -> BatchLimits {
        self.limits
    }

    fn currency(&self) -> &str {
        CURRENCY
    }

    async fn list_offers(&self, continuation: Option<&str>) -> Result<OfferPage, MarketplaceError> {
        let body = ProductListRequest {
            filter: ProductFilter { visibility: "ALL" },
            last_id: continuation.unwrap_or(""),
            limit: LIST_PAGE_SIZE,
        };
        let response: ProductListResponse = self.post("/v2/product/list", &body).await?;
        let result = response.result;

        debug!(
            "[SellerApi] Listed {} products (total {}, last_id '{}')",
            result.items.len(),
            result.total,
            result.last_id
        );

        Ok(OfferPage {
            offer_ids: result.items.into_iter().map(|item| item.offer_id).collect(),
            next_token: Some(result.last_id),
            total: Some(result.total),
        })
    }

    async fn push_stock_updates(&self, batch: &[StockUpdate]) -> Result<(), MarketplaceError> {
        let body = StockImportRequest {
            stocks: batch
                .iter()
                .map(|update| StockItem {
                    offer_id: &update.offer_id,
                    stock: update.quantity,
                })
                .collect(),
        };
        let response: ImportResponse = self.post("/v1/product/import/stocks", &body).await?;
        debug!("[SellerApi] Pushed {} stock updates", batch.len());
        Self::log_rejected("Stock", response);
        Ok(())
    }

    async fn push_price_updates(&self, batch: &[PriceUpdate]) -> Result<(), MarketplaceError> {
        let body = PriceImportRequest {
            prices: batch
                .iter()
                .map(|update| PriceItem {
                    auto_action_enabled: "UNKNOWN",
                    currency_code: &update.currency,
                    offer_id: &update.offer_id,
                    old_price: "0",
                    price: update.amount.to_string(),
                })
                .collect(),
        };
        let response: ImportResponse = self.post("/v1/product/import/prices", &body).await?;
        debug!("[SellerApi] Pushed {} price updates", batch.len());
        Self::log_rejected("Price", response);
        Ok(())
    }
}
