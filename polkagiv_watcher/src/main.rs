mod report;

use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use log::{info, warn};
use polkagiv_core::config::Config;
use polkagiv_core::contract::cache::CampaignBook;
use polkagiv_core::contract::handler::ContractReader;
use polkagiv_core::portfolio::handler::PortfolioValuator;
use polkagiv_core::prices::cache::PriceCache;
use polkagiv_core::prices::handler::PriceFeedClient;
use polkagiv_core::tokens::handler::TokenRegistry;

use crate::report::{report_campaigns, report_prices};

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();
    info!("Starting polkagiv_watcher...");

    let config = Config::from_env()?;
    let registry = Arc::new(TokenRegistry::from_config(&config));

    let prices = Arc::new(PriceCache::new(
        PriceFeedClient::new(&config.price_feed_url),
        registry.price_feed_ids(),
    ));
    prices.refresh().await;
    let poller = prices.spawn_poller(config.price_refresh);

    let reader = config
        .donor_contract_address
        .map(|address| ContractReader::new(&config.rpc_url, address));

    let mut valuator = PortfolioValuator::new(registry.clone(), prices.clone())
        .with_goal_decimals(config.goal_decimals);

    match &reader {
        Some(reader) => {
            match reader.chain_id().await {
                Ok(chain_id) => info!(
                    "Reading donor contract {} on chain {}",
                    reader.contract_address(),
                    chain_id
                ),
                Err(e) => warn!("⚠️ Could not read chain id from {}: {}", config.rpc_url, e),
            }
            valuator = valuator.with_metadata(Arc::new(reader.clone()));
        }
        None => warn!("⚠️ DONOR_CONTRACT_ADDRESS not set, only token prices will be reported"),
    }

    let book = CampaignBook::new();
    let mut ticker = tokio::time::interval(config.price_refresh);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down polkagiv_watcher");
                break;
            }
            _ = ticker.tick() => match &reader {
                Some(reader) => report_campaigns(reader, &book, &valuator).await,
                None => report_prices(&prices).await,
            },
        }
    }

    poller.stop();
    Ok(())
}
