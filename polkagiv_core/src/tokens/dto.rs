use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub address: Option<Address>,
    pub price_feed_id: Option<String>,
}

impl TokenInfo {
    pub fn new(name: &str, symbol: &str, decimals: u8, price_feed_id: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            address: None,
            price_feed_id: Some(price_feed_id.to_string()),
        }
    }

    pub fn with_address(mut self, address: Option<Address>) -> Self {
        self.address = address;
        self
    }

    /// Placeholder for tokens the registry does not know.
    pub fn unknown(address: Option<Address>) -> Self {
        Self {
            name: "Unknown".to_string(),
            symbol: "UNKNOWN".to_string(),
            decimals: 18,
            address,
            price_feed_id: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.symbol == "UNKNOWN" && self.price_feed_id.is_none()
    }
}
