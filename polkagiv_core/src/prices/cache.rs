use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{info, warn};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::prices::dto::{fallback_prices, PriceMap, TokenPrice};
use crate::prices::handler::PriceFeedClient;

#[derive(Debug, Default)]
struct PriceState {
    prices: PriceMap,
    loaded: bool,
    loading: bool,
    last_refreshed: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Owned price cache. Each successful refresh replaces the whole mapping.
pub struct PriceCache {
    client: PriceFeedClient,
    ids: Vec<String>,
    state: RwLock<PriceState>,
}

impl PriceCache {
    pub fn new(client: PriceFeedClient, ids: Vec<String>) -> Self {
        Self {
            client,
            ids,
            state: RwLock::new(PriceState::default()),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub async fn refresh(&self) {
        self.state.write().await.loading = true;

        let result = self.client.fetch_prices(&self.ids).await;

        let mut state = self.state.write().await;
        state.loading = false;

        match result {
            Ok(prices) => {
                info!("Refreshed {} token prices", prices.len());
                Self::replace(&mut state, prices);
                state.last_error = None;
            }
            Err(e) => {
                warn!("⚠️ Failed to refresh token prices: {}", e);
                state.last_error = Some(e.to_string());

                // keep whatever was loaded before
                if !state.loaded {
                    Self::replace(&mut state, fallback_prices());
                }
            }
        }
    }

    /// Replaces the cached mapping without touching the network.
    pub async fn install(&self, prices: PriceMap) {
        let mut state = self.state.write().await;
        Self::replace(&mut state, prices);
    }

    fn replace(state: &mut PriceState, prices: PriceMap) {
        state.prices = prices;
        state.loaded = true;
        state.last_refreshed = Some(Utc::now());
    }

    pub async fn snapshot(&self) -> PriceMap {
        self.state.read().await.prices.clone()
    }

    pub async fn price(&self, id: &str) -> Option<TokenPrice> {
        self.state.read().await.prices.get(id).copied()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.last_refreshed
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    /// Refreshes now and then once per `period` until the poller is
    /// stopped or dropped.
    pub fn spawn_poller(self: &Arc<Self>, period: Duration) -> PricePoller {
        let cache = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                cache.refresh().await;
            }
        });

        PricePoller { handle }
    }
}

/// Guard for the background refresh task.
pub struct PricePoller {
    handle: JoinHandle<()>,
}

impl PricePoller {
    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for PricePoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
