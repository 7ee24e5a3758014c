//! Yandex Market Partner API client.
//!
//! One client serves one campaign (an FBS or DBS shop). The offer mapping
//! listing is paged by token; pagination ends when the response carries no
//! `nextPageToken`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use stocksync_core::{BatchLimits, PriceUpdate, StockUpdate};

use crate::errors::MarketplaceError;
use crate::http::{build_client, header_value, send_json};
use crate::models::OfferPage;
use crate::traits::MarketplaceClient;

/// Production endpoint of the Partner API.
pub const DEFAULT_YANDEX_MARKET_API_URL: &str = "https://api.partner.market.yandex.ru";

/// Request size limits of the stock and price update endpoints.
pub const YANDEX_MARKET_BATCH_LIMITS: BatchLimits = BatchLimits {
    stock: 2000,
    price: 500,
};

const CURRENCY: &str = "RUR";
const LIST_PAGE_SIZE: &str = "200";
const UPDATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappingEntriesResponse {
    result: MappingEntriesResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappingEntriesResult {
    #[serde(default)]
    offer_mapping_entries: Vec<MappingEntry>,
    #[serde(default)]
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct MappingEntry {
    offer: MappedOffer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappedOffer {
    shop_sku: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paging {
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct StocksRequest<'a> {
    skus: Vec<SkuStock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SkuStock<'a> {
    sku: &'a str,
    warehouse_id: &'a str,
    items: [StockItem; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StockItem {
    count: u32,
    #[serde(rename = "type")]
    kind: &'static str,
    updated_at: String,
}

#[derive(Debug, Serialize)]
struct PricesRequest<'a> {
    offers: Vec<OfferPrice<'a>>,
}

#[derive(Debug, Serialize)]
struct OfferPrice<'a> {
    id: &'a str,
    price: Price<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Price<'a> {
    value: u64,
    currency_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: Option<String>,
}

/// Client for one Yandex Market campaign.
pub struct YandexMarketClient {
    client: Client,
    base_url: String,
    headers: HeaderMap,
    campaign_id: String,
    warehouse_id: String,
    platform: String,
    limits: BatchLimits,
}

impl YandexMarketClient {
    /// Create a client for `campaign_id`, attributing stock to `warehouse_id`.
    pub fn new(
        token: &str,
        campaign_id: &str,
        warehouse_id: &str,
        timeout: Duration,
    ) -> Result<Self, MarketplaceError> {
        let platform = format!("yandex_market:{}", campaign_id);
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            header_value("Authorization", &format!("Bearer {}", token))?,
        );

        Ok(Self {
            client: build_client(&platform, timeout)?,
            base_url: DEFAULT_YANDEX_MARKET_API_URL.to_string(),
            headers,
            campaign_id: campaign_id.to_string(),
            warehouse_id: warehouse_id.to_string(),
            platform,
            limits: YANDEX_MARKET_BATCH_LIMITS,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_batch_limits(mut self, limits: BatchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn campaign_id(&self) -> &str {
        &self.campaign_id
    }

    fn campaign_url(&self, path: &str) -> String {
        format!("{}/campaigns/{}{}", self.base_url, self.campaign_id, path)
    }

    fn check_status(&self, response: StatusResponse) -> Result<(), MarketplaceError> {
        match response.status.as_deref() {
            None | Some("OK") => Ok(()),
            Some(other) => Err(MarketplaceError::Decode {
                platform: self.platform.clone(),
                message: format!("unexpected status '{}'", other),
            }),
        }
    }
}

#[async_trait]
impl MarketplaceClient for YandexMarketClient {
    fn platform(&self) -> &str {
        &self.platform
    }

    fn batch_limits(&self) -> BatchLimits {
        self.limits
    }

    fn currency(&self) -> &str {
        CURRENCY
    }

    fn warehouse_id(&self) -> Option<&str> {
        Some(&self.warehouse_id)
    }

    async fn list_offers(&self, continuation: Option<&str>) -> Result<OfferPage, MarketplaceError> {
        let query = [
            ("page_token", continuation.unwrap_or("")),
            ("limit", LIST_PAGE_SIZE),
        ];
        let request = self
            .client
            .get(self.campaign_url("/offer-mapping-entries"))
            .headers(self.headers.clone())
            .query(&query);
        let response: MappingEntriesResponse = send_json(&self.platform, request).await?;
        let result = response.result;

        let next_token = result
            .paging
            .and_then(|p| p.next_page_token)
            .filter(|t| !t.is_empty());
        debug!(
            "[MarketApi] Campaign {} listed {} offers (next page: {})",
            self.campaign_id,
            result.offer_mapping_entries.len(),
            next_token.is_some()
        );

        Ok(OfferPage {
            offer_ids: result
                .offer_mapping_entries
                .into_iter()
                .map(|entry| entry.offer.shop_sku)
                .collect(),
            next_token,
            total: None,
        })
    }

    async fn push_stock_updates(&self, batch: &[StockUpdate]) -> Result<(), MarketplaceError> {
        let now = Utc::now();
        let body = StocksRequest {
            skus: batch
                .iter()
                .map(|update| SkuStock {
                    sku: &update.offer_id,
                    warehouse_id: update.warehouse_id.as_deref().unwrap_or(&self.warehouse_id),
                    items: [StockItem {
                        count: update.quantity,
                        kind: "FIT",
                        updated_at: update
                            .updated_at
                            .unwrap_or(now)
                            .format(UPDATED_AT_FORMAT)
                            .to_string(),
                    }],
                })
                .collect(),
        };
        let request = self
            .client
            .put(self.campaign_url("/offers/stocks"))
            .headers(self.headers.clone())
            .json(&body);
        let response: StatusResponse = send_json(&self.platform, request).await?;
        debug!(
            "[MarketApi] Campaign {} pushed {} stock updates",
            self.campaign_id,
            batch.len()
        );
        self.check_status(response)
    }

    async fn push_price_updates(&self, batch: &[PriceUpdate]) -> Result<(), MarketplaceError> {
        let body = PricesRequest {
            offers: batch
                .iter()
                .map(|update| OfferPrice {
                    id: &update.offer_id,
                    price: Price {
                        value: update.amount,
                        currency_id: &update.currency,
                    },
                })
                .collect(),
        };
        let request = self
            .client
            .post(self.campaign_url("/offer-prices/updates"))
            .headers(self.headers.clone())
            .json(&body);
        let response: StatusResponse = send_json(&self.platform, request).await?;
        debug!(
            "[MarketApi] Campaign {} pushed {} price updates",
            self.campaign_id,
            batch.len()
        );
        self.check_status(response)
    }
}
