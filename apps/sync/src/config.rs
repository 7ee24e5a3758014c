use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use stocksync_core::BatchLimits;
use stocksync_inventory::DEFAULT_INVENTORY_URL;
use stocksync_marketplace::{
    DEFAULT_OZON_API_URL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_YANDEX_MARKET_API_URL,
    OZON_BATCH_LIMITS, YANDEX_MARKET_BATCH_LIMITS,
};

/// Seller platform credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerConfig {
    pub client_id: String,
    pub api_key: String,
    pub api_url: String,
    pub limits: BatchLimits,
}

/// One market campaign (FBS or DBS shop) and the warehouse its stock goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketCampaign {
    pub label: &'static str,
    pub campaign_id: String,
    pub warehouse_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    pub token: String,
    pub api_url: String,
    pub limits: BatchLimits,
    pub campaigns: Vec<MarketCampaign>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub seller: Option<SellerConfig>,
    pub market: Option<MarketConfig>,
    pub inventory_url: String,
    pub request_timeout: Duration,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let request_timeout = parse_var::<u64, _>(&get, "STOCKSYNC_REQUEST_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let seller = match (get("CLIENT_ID"), get("SELLER_TOKEN")) {
            (Some(client_id), Some(api_key)) => Some(SellerConfig {
                client_id,
                api_key,
                api_url: get("SELLER_API_URL").unwrap_or_else(|| DEFAULT_OZON_API_URL.into()),
                limits: OZON_BATCH_LIMITS
                    .with_stock(parse_var(&get, "SELLER_STOCK_BATCH")?)
                    .with_price(parse_var(&get, "SELLER_PRICE_BATCH")?),
            }),
            _ => None,
        };

        let market = match get("MARKET_TOKEN") {
            Some(token) => {
                let campaigns: Vec<MarketCampaign> = [
                    ("fbs", "FBS_ID", "WAREHOUSE_FBS_ID"),
                    ("dbs", "DBS_ID", "WAREHOUSE_DBS_ID"),
                ]
                .into_iter()
                .filter_map(|(label, campaign_key, warehouse_key)| {
                    Some(MarketCampaign {
                        label,
                        campaign_id: get(campaign_key)?,
                        warehouse_id: get(warehouse_key)?,
                    })
                })
                .collect();
                Some(MarketConfig {
                    token,
                    api_url: get("MARKET_API_URL")
                        .unwrap_or_else(|| DEFAULT_YANDEX_MARKET_API_URL.into()),
                    limits: YANDEX_MARKET_BATCH_LIMITS
                        .with_stock(parse_var(&get, "MARKET_STOCK_BATCH")?)
                        .with_price(parse_var(&get, "MARKET_PRICE_BATCH")?),
                    campaigns,
                })
            }
            None => None,
        };

        Ok(Self {
            seller,
            market,
            inventory_url: get("INVENTORY_URL").unwrap_or_else(|| DEFAULT_INVENTORY_URL.into()),
            request_timeout,
            log_format: get("STOCKSYNC_LOG_FORMAT").unwrap_or_else(|| "text".into()),
        })
    }
}

fn parse_var<T, G>(get: &G, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("Invalid {}: '{}'", key, raw))
        })
        .transpose()
}
