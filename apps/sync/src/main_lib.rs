use std::sync::Arc;

use anyhow::Context;
use stocksync_core::FailureKind;
use stocksync_inventory::{ArchiveInventorySource, InventorySource};
use stocksync_marketplace::{
    LogProgressReporter, MarketplaceClient, OzonSellerClient, SyncConfig, SyncOrchestrator,
    YandexMarketClient,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Creates one client per configured platform target, seller platform first.
pub fn build_targets(config: &Config) -> anyhow::Result<Vec<Arc<dyn MarketplaceClient>>> {
    let mut targets: Vec<Arc<dyn MarketplaceClient>> = Vec::new();

    if let Some(seller) = &config.seller {
        let timeout = config.request_timeout;
        let client = OzonSellerClient::new(&seller.client_id, &seller.api_key, timeout)
            .context("Failed to create seller platform client")?
            .with_base_url(seller.api_url.as_str())
            .with_batch_limits(seller.limits);
        targets.push(Arc::new(client));
    }

    if let Some(market) = &config.market {
        for campaign in &market.campaigns {
            let client = YandexMarketClient::new(
                &market.token,
                &campaign.campaign_id,
                &campaign.warehouse_id,
                config.request_timeout,
            )
            .with_context(|| {
                format!("Failed to create market client for {} campaign", campaign.label)
            })?
            .with_base_url(market.api_url.as_str())
            .with_batch_limits(market.limits);
            targets.push(Arc::new(client));
        }
    }

    Ok(targets)
}

/// Loads the vendor inventory once and syncs it to every target.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let targets = build_targets(config)?;
    if targets.is_empty() {
        tracing::warn!("No marketplace targets configured, nothing to sync");
        return Ok(());
    }
    tracing::info!(
        "Syncing to {} targets: {}",
        targets.len(),
        targets
            .iter()
            .map(|t| t.platform())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let source = ArchiveInventorySource::new(config.inventory_url.as_str(), config.request_timeout)
        .context("Failed to create inventory source")?;
    let records = match source.fetch_vendor_records().await {
        Ok(records) => records,
        Err(err) => {
            match err.failure_kind() {
                FailureKind::NetworkTimeout => {
                    tracing::error!("Inventory download timed out: {}", err)
                }
                FailureKind::ConnectionFailure => {
                    tracing::error!("Inventory host unreachable: {}", err)
                }
                FailureKind::Unclassified => tracing::error!("Inventory unavailable: {}", err),
            }
            return Err(err).context("Failed to load vendor inventory");
        }
    };

    let orchestrator = SyncOrchestrator::new(Arc::new(LogProgressReporter), SyncConfig::default());
    let outcomes = orchestrator.run_all(&targets, &records).await;

    let mut failed = Vec::new();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => tracing::info!(
                "[{}] {} offers: {} stock updates ({} available), {} price updates",
                report.platform,
                report.offers_fetched,
                report.stock.updates.len(),
                report.stock.available.len(),
                report.price.updates.len()
            ),
            Err(err) => failed.push(format!("{} ({})", outcome.platform, err.failure_kind())),
        }
    }

    if !failed.is_empty() {
        anyhow::bail!(
            "{} of {} platform runs failed: {}",
            failed.len(),
            outcomes.len(),
            failed.join(", ")
        );
    }
    Ok(())
}
