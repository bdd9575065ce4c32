use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolkagivError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("ABI decode error: {0}")]
    Abi(#[from] alloy_sol_types::Error),
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Price feed unavailable: {0}")]
    PriceFeed(String),
    #[error("Malformed on-chain data: {0}")]
    MalformedData(String),
    #[error("Invalid amount: {0}")]
    Units(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type PolkagivResult<T> = Result<T, PolkagivError>;
