use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub token_address: Address,
    pub symbol: String,
    pub balance: U256,
    pub balance_formatted: String,
    pub usd_value: f64,
    pub decimals: u8,
    /// `usd_value` with six fractional digits.
    pub usd_equivalent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignPortfolio {
    pub total_usd_value: f64,
    pub token_balances: Vec<TokenBalance>,
    pub progress: f64,
    pub goal_usd: f64,
    pub raised_usd: f64,
}

impl CampaignPortfolio {
    /// Zero-valued portfolio returned when the balances cannot be read.
    pub fn empty(goal_usd: f64) -> Self {
        Self {
            total_usd_value: 0.0,
            token_balances: vec![],
            progress: 0.0,
            goal_usd,
            raised_usd: 0.0,
        }
    }
}

/// Share of a portfolio held in one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub symbol: String,
    pub usd_value: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Conversion {
    pub converted: f64,
    pub rate: f64,
}
