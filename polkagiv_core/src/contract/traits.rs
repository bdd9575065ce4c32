use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use crate::error::PolkagivResult;

/// Supplies the per-token balances held by a campaign as parallel arrays.
#[async_trait]
pub trait TokenBalanceSource: Send + Sync {
    async fn campaign_token_balances(
        &self,
        campaign_id: u64,
    ) -> PolkagivResult<(Vec<Address>, Vec<U256>)>;
}

/// On-chain `symbol()` / `decimals()` reads for tokens missing from the
/// registry.
#[async_trait]
pub trait TokenMetadataSource: Send + Sync {
    async fn token_symbol(&self, token: Address) -> PolkagivResult<String>;

    async fn token_decimals(&self, token: Address) -> PolkagivResult<u8>;
}
