use std::sync::Arc;

use alloy_primitives::{Address, U256};
use log::{debug, error, warn};

use crate::config::DEFAULT_GOAL_DECIMALS;
use crate::contract::traits::{TokenBalanceSource, TokenMetadataSource};
use crate::portfolio::dto::{Allocation, CampaignPortfolio, Conversion, TokenBalance};
use crate::prices::cache::PriceCache;
use crate::prices::dto::{fallback_prices, PriceMap};
use crate::progress::handler::progress_percent;
use crate::tokens::dto::TokenInfo;
use crate::tokens::handler::TokenRegistry;
use crate::units::{format_units, to_f64};

/// Values a campaign's multi-token holdings in USD.
#[derive(Clone)]
pub struct PortfolioValuator {
    registry: Arc<TokenRegistry>,
    prices: Arc<PriceCache>,
    metadata: Option<Arc<dyn TokenMetadataSource>>,
    goal_decimals: u8,
}

impl PortfolioValuator {
    pub fn new(registry: Arc<TokenRegistry>, prices: Arc<PriceCache>) -> Self {
        Self {
            registry,
            prices,
            metadata: None,
            goal_decimals: DEFAULT_GOAL_DECIMALS,
        }
    }

    /// Enables on-chain `symbol()` / `decimals()` reads for tokens the
    /// registry cannot price.
    pub fn with_metadata(mut self, metadata: Arc<dyn TokenMetadataSource>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_goal_decimals(mut self, goal_decimals: u8) -> Self {
        self.goal_decimals = goal_decimals;
        self
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Never fails: a failed balance read yields an all-zero portfolio and a
    /// token without a price contributes nothing.
    pub async fn calculate_portfolio_value(
        &self,
        campaign_id: u64,
        goal_amount: U256,
        balances: &dyn TokenBalanceSource,
    ) -> CampaignPortfolio {
        let goal_usd = to_f64(goal_amount, self.goal_decimals);

        let (tokens, amounts) = match balances.campaign_token_balances(campaign_id).await {
            Ok(pair) => pair,
            Err(e) => {
                error!("❌ Failed to read token balances of campaign {}: {}", campaign_id, e);
                return CampaignPortfolio::empty(goal_usd);
            }
        };

        if tokens.len() != amounts.len() {
            error!(
                "❌ Campaign {} returned {} tokens but {} balances",
                campaign_id,
                tokens.len(),
                amounts.len()
            );
            return CampaignPortfolio::empty(goal_usd);
        }

        let prices = self.prices.snapshot().await;
        let mut total_usd_value = 0.0;
        let mut token_balances = Vec::new();

        for (token_address, balance) in tokens.into_iter().zip(amounts) {
            if balance.is_zero() {
                continue;
            }

            let token = self.resolve_token(token_address).await;
            let usd_value = convert_to_usd(balance, &token, &self.registry, &prices);
            total_usd_value += usd_value;

            token_balances.push(TokenBalance {
                token_address,
                symbol: token.symbol.clone(),
                balance,
                balance_formatted: format_units(balance, token.decimals),
                usd_value,
                decimals: token.decimals,
                usd_equivalent: format!("{:.6}", usd_value),
            });
        }

        debug!(
            "Campaign {} valued at ${:.2} across {} tokens",
            campaign_id,
            total_usd_value,
            token_balances.len()
        );

        CampaignPortfolio {
            total_usd_value,
            token_balances,
            progress: progress_percent(total_usd_value, goal_usd),
            goal_usd,
            raised_usd: total_usd_value,
        }
    }

    /// Registry entry for `address`, enriched from the token contract when
    /// the registry has no price feed for it.
    pub async fn resolve_token(&self, address: Address) -> TokenInfo {
        let token = self.registry.resolve(Some(&address));
        if token.price_feed_id.is_some() {
            return token;
        }

        let Some(metadata) = &self.metadata else {
            return token;
        };

        let (symbol, decimals) = futures::join!(
            metadata.token_symbol(address),
            metadata.token_decimals(address)
        );

        let symbol = match symbol {
            Ok(symbol) => symbol,
            Err(e) => {
                warn!("⚠️ Could not read symbol() of {}: {}", address, e);
                return token;
            }
        };

        if let Some(known) = self.registry.tokens().iter().find(|t| t.symbol == symbol) {
            return known.clone().with_address(Some(address));
        }

        let decimals = match decimals {
            Ok(decimals) => decimals,
            Err(e) => {
                warn!("⚠️ Could not read decimals() of {}: {}", address, e);
                token.decimals
            }
        };

        TokenInfo {
            name: symbol.clone(),
            symbol,
            decimals,
            address: Some(address),
            price_feed_id: None,
        }
    }
}

/// USD price for `token`, tried against the live prices and then the
/// fallback table, by price feed id, lowercase symbol and the registry's
/// id for the same symbol. Zero or missing prices are unresolved.
pub fn resolve_price(token: &TokenInfo, registry: &TokenRegistry, prices: &PriceMap) -> Option<f64> {
    let mut keys: Vec<String> = Vec::new();
    if let Some(id) = &token.price_feed_id {
        keys.push(id.clone());
    }
    keys.push(token.symbol.to_lowercase());
    if let Some(id) = registry
        .by_symbol(&token.symbol)
        .and_then(|known| known.price_feed_id.clone())
    {
        keys.push(id);
    }

    let lookup = |table: &PriceMap| {
        keys.iter()
            .filter_map(|key| table.get(key))
            .map(|price| price.usd)
            .find(|usd| usd.is_finite() && *usd > 0.0)
    };

    lookup(prices).or_else(|| lookup(&fallback_prices()))
}

pub fn convert_to_usd(
    amount: U256,
    token: &TokenInfo,
    registry: &TokenRegistry,
    prices: &PriceMap,
) -> f64 {
    if amount.is_zero() {
        return 0.0;
    }

    match resolve_price(token, registry, prices) {
        Some(price) => to_f64(amount, token.decimals) * price,
        None => {
            warn!(
                "⚠️ No USD price for {} ({:?}), valuing it at 0",
                token.symbol, token.address
            );
            0.0
        }
    }
}

/// USD value expressed as a USDC amount string (1 USDC = 1 USD).
pub fn to_usdc_equivalent(
    amount: U256,
    token: &TokenInfo,
    registry: &TokenRegistry,
    prices: &PriceMap,
) -> String {
    format!("{:.6}", convert_to_usd(amount, token, registry, prices))
}

pub fn allocations(portfolio: &CampaignPortfolio) -> Vec<Allocation> {
    portfolio
        .token_balances
        .iter()
        .map(|token| {
            let percentage = if portfolio.total_usd_value > 0.0 {
                (token.usd_value / portfolio.total_usd_value * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            };

            Allocation {
                symbol: token.symbol.clone(),
                usd_value: token.usd_value,
                percentage,
            }
        })
        .collect()
}

/// Converts `amount` of one registry token into another at current prices.
pub fn convert_between(
    amount: f64,
    from_symbol: &str,
    to_symbol: &str,
    registry: &TokenRegistry,
    prices: &PriceMap,
) -> Conversion {
    let price_of = |symbol: &str| {
        let token = registry.by_symbol(symbol)?;
        let id = token.price_feed_id.as_ref()?;
        prices
            .get(id)
            .map(|price| price.usd)
            .filter(|usd| usd.is_finite() && *usd > 0.0)
    };

    match (price_of(from_symbol), price_of(to_symbol)) {
        (Some(from), Some(to)) => {
            let rate = from / to;
            Conversion {
                converted: amount * rate,
                rate,
            }
        }
        _ => Conversion::default(),
    }
}
