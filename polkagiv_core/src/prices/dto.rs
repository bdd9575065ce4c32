use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One entry of the price API response.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenPrice {
    #[serde(default)]
    pub usd: f64,
    #[serde(default)]
    pub usd_24h_change: f64,
    #[serde(default)]
    pub last_updated_at: i64,
}

/// Price feed id -> price.
pub type PriceMap = HashMap<String, TokenPrice>;

/// Used when the price API cannot be reached.
pub fn fallback_prices() -> PriceMap {
    let now = Utc::now().timestamp();

    [
        ("usd-coin", 1.0, 0.0),
        ("weth", 3213.0, 2.5),
        ("wrapped-bitcoin", 110_464.0, 1.2),
    ]
    .into_iter()
    .map(|(id, usd, change)| {
        (
            id.to_string(),
            TokenPrice {
                usd,
                usd_24h_change: change,
                last_updated_at: now,
            },
        )
    })
    .collect()
}
