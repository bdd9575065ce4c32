use serde::{Deserialize, Serialize};

/// One scored interpretation of a goal/raised pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecimalGuess {
    pub decimals: u8,
    pub score: u8,
    pub goal_value: f64,
    pub raised_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProgressSource {
    Portfolio,
    OnChainFallback { decimals: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressView {
    pub progress: f64,
    pub raised_usd: f64,
    pub goal_usd: f64,
    pub source: ProgressSource,
    pub days_left: u64,
}
