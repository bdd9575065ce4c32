use alloy_primitives::Address;

use crate::config::Config;
use crate::tokens::dto::TokenInfo;

/// Static list of the tokens the donor contract accepts.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: Vec<TokenInfo>,
}

impl TokenRegistry {
    pub fn new(tokens: Vec<TokenInfo>) -> Self {
        Self { tokens }
    }

    pub fn from_config(config: &Config) -> Self {
        let tokens = vec![
            TokenInfo::new("USD Coin", "USDC", 6, "usd-coin").with_address(config.usdc_address),
            TokenInfo::new("Wrapped Ether", "WETH", 18, "weth").with_address(config.weth_address),
            TokenInfo::new("Wrapped Bitcoin", "WBTC", 8, "wrapped-bitcoin")
                .with_address(config.wbtc_address),
        ];

        for token in tokens.iter().filter(|token| token.address.is_none()) {
            log::warn!(
                "No contract address configured for {}, balances in it will resolve as UNKNOWN",
                token.symbol
            );
        }

        Self { tokens }
    }

    pub fn tokens(&self) -> &[TokenInfo] {
        &self.tokens
    }

    pub fn by_address(&self, address: &Address) -> Option<&TokenInfo> {
        self.tokens
            .iter()
            .find(|token| token.address.as_ref() == Some(address))
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&TokenInfo> {
        self.tokens
            .iter()
            .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn by_price_feed_id(&self, id: &str) -> Option<&TokenInfo> {
        self.tokens
            .iter()
            .find(|token| token.price_feed_id.as_deref() == Some(id))
    }

    /// Registry entry for `address`, or the `UNKNOWN` placeholder.
    pub fn resolve(&self, address: Option<&Address>) -> TokenInfo {
        match address {
            Some(address) => self
                .by_address(address)
                .cloned()
                .unwrap_or_else(|| TokenInfo::unknown(Some(*address))),
            None => TokenInfo::unknown(None),
        }
    }

    /// Price feed ids to poll, deduplicated in registry order.
    pub fn price_feed_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.tokens.iter().filter_map(|token| token.price_feed_id.as_ref()) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}
