use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{keccak256, Address, Bytes, B256, U256, U64};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::contract::abi::{IDonorContract, IERC20Metadata};
use crate::contract::dto::{Campaign, Donation, RpcResponse};
use crate::contract::traits::{TokenBalanceSource, TokenMetadataSource};
use crate::error::{PolkagivError, PolkagivResult};

pub const DEFAULT_ADMIN_ROLE: &str = "DEFAULT_ADMIN_ROLE";

/// Read-only JSON-RPC client for the donor contract.
#[derive(Clone)]
pub struct ContractReader {
    client: Client,
    rpc_url: String,
    contract_address: Address,
    next_id: Arc<AtomicU64>,
}

impl ContractReader {
    pub fn new(rpc_url: &str, contract_address: Address) -> Self {
        let client = Client::new();

        Self {
            client,
            rpc_url: rpc_url.to_string(),
            contract_address,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    async fn rpc<T: DeserializeOwned>(&self, method: &str, params: Value) -> PolkagivResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("🌐 RPC {} #{} -> {}", method, id, self.rpc_url);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": method,
                "params": params,
            }))
            .send()
            .await?
            .error_for_status()?;

        let body: RpcResponse<T> = response.json().await?;

        if let Some(err) = body.error {
            error!("❌ RPC {} failed: {} {}", method, err.code, err.message);
            return Err(PolkagivError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        body.result.ok_or_else(|| {
            PolkagivError::MalformedData(format!("{} returned neither result nor error", method))
        })
    }

    async fn eth_call<C: SolCall>(&self, to: Address, call: C) -> PolkagivResult<C::Return> {
        let data = Bytes::from(call.abi_encode());
        let output: Bytes = self
            .rpc("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await?;

        if output.is_empty() {
            return Err(PolkagivError::MalformedData(format!(
                "{} returned no data from {}",
                C::SIGNATURE,
                to
            )));
        }

        Ok(C::abi_decode_returns(&output)?)
    }

    pub async fn chain_id(&self) -> PolkagivResult<u64> {
        let chain_id: U64 = self.rpc("eth_chainId", json!([])).await?;
        Ok(chain_id.to::<u64>())
    }

    pub async fn native_balance(&self, account: Address) -> PolkagivResult<U256> {
        self.rpc("eth_getBalance", json!([account, "latest"])).await
    }

    pub async fn get_all_campaigns(&self) -> PolkagivResult<Vec<Campaign>> {
        let raw = self
            .eth_call(self.contract_address, IDonorContract::getAllCampaignsCall {})
            .await?;

        raw.into_iter().map(Campaign::try_from).collect()
    }

    pub async fn get_campaign_by_id(&self, campaign_id: u64) -> PolkagivResult<Campaign> {
        let raw = self
            .eth_call(
                self.contract_address,
                IDonorContract::getCampaignByIdCall {
                    campaignId: U256::from(campaign_id),
                },
            )
            .await?;

        Campaign::try_from(raw)
    }

    pub async fn get_campaign_donations(&self, campaign_id: u64) -> PolkagivResult<Vec<Donation>> {
        let raw = self
            .eth_call(
                self.contract_address,
                IDonorContract::getCampaignDonationsCall {
                    campaignId: U256::from(campaign_id),
                },
            )
            .await?;

        raw.into_iter().map(Donation::try_from).collect()
    }

    pub async fn get_campaign_token_balances(
        &self,
        campaign_id: u64,
    ) -> PolkagivResult<(Vec<Address>, Vec<U256>)> {
        let ret = self
            .eth_call(
                self.contract_address,
                IDonorContract::getCampaignTokenBalancesCall {
                    campaignId: U256::from(campaign_id),
                },
            )
            .await?;

        Ok((ret.tokens, ret.balances))
    }

    pub async fn get_campaign_funds_by_token(
        &self,
        campaign_id: u64,
        token: Address,
    ) -> PolkagivResult<U256> {
        self.eth_call(
            self.contract_address,
            IDonorContract::getCampaignFundsByTokenCall {
                campaignId: U256::from(campaign_id),
                token,
            },
        )
        .await
    }

    pub async fn is_campaign_successful(&self, campaign_id: u64) -> PolkagivResult<bool> {
        self.eth_call(
            self.contract_address,
            IDonorContract::isCampaignSuccessfulCall {
                campaignId: U256::from(campaign_id),
            },
        )
        .await
    }

    pub async fn has_role(&self, role_name: &str, account: Address) -> PolkagivResult<bool> {
        self.eth_call(
            self.contract_address,
            IDonorContract::hasRoleCall {
                role: role_id(role_name),
                account,
            },
        )
        .await
    }
}

/// AccessControl role id: `keccak256(name)`, except the admin role which is
/// the zero word.
pub fn role_id(role_name: &str) -> B256 {
    if role_name == DEFAULT_ADMIN_ROLE {
        return B256::ZERO;
    }
    keccak256(role_name.as_bytes())
}

#[async_trait]
impl TokenBalanceSource for ContractReader {
    async fn campaign_token_balances(
        &self,
        campaign_id: u64,
    ) -> PolkagivResult<(Vec<Address>, Vec<U256>)> {
        self.get_campaign_token_balances(campaign_id).await
    }
}

#[async_trait]
impl TokenMetadataSource for ContractReader {
    async fn token_symbol(&self, token: Address) -> PolkagivResult<String> {
        self.eth_call(token, IERC20Metadata::symbolCall {}).await
    }

    async fn token_decimals(&self, token: Address) -> PolkagivResult<u8> {
        self.eth_call(token, IERC20Metadata::decimalsCall {}).await
    }
}
