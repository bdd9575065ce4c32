use chrono::{DateTime, Utc};
use log::{error, info};
use tokio::sync::RwLock;

use crate::contract::dto::Campaign;
use crate::contract::handler::ContractReader;

#[derive(Debug, Default)]
struct CampaignState {
    campaigns: Vec<Campaign>,
    last_refreshed: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Owned copy of the campaign list, replaced on every successful refresh.
#[derive(Debug, Default)]
pub struct CampaignBook {
    state: RwLock<CampaignState>,
}

impl CampaignBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of campaigns loaded. On failure the previous list
    /// is kept and the error recorded.
    pub async fn refresh(&self, reader: &ContractReader) -> usize {
        match reader.get_all_campaigns().await {
            Ok(campaigns) => {
                let mut state = self.state.write().await;
                info!("Loaded {} campaigns", campaigns.len());
                state.campaigns = campaigns;
                state.last_refreshed = Some(Utc::now());
                state.last_error = None;
                state.campaigns.len()
            }
            Err(e) => {
                error!("❌ Failed to load campaigns: {}", e);
                let mut state = self.state.write().await;
                state.last_error = Some(e.to_string());
                state.campaigns.len()
            }
        }
    }

    pub async fn all(&self) -> Vec<Campaign> {
        self.state.read().await.campaigns.clone()
    }

    pub async fn get_by_id(&self, id: u64) -> Option<Campaign> {
        self.state
            .read()
            .await
            .campaigns
            .iter()
            .find(|campaign| campaign.id == id)
            .cloned()
    }

    pub async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.last_refreshed
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::abi;
    use alloy_primitives::{hex, Address, U256};
    use alloy_sol_types::SolValue;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn raw_campaign(id: u64, name: &str) -> abi::Campaign {
        abi::Campaign {
            id: U256::from(id),
            name: name.to_string(),
            description: String::new(),
            creator: Address::ZERO,
            goalAmount: U256::from(1_000_000_000u64),
            totalDonated: U256::ZERO,
            createdAt: U256::from(1_700_000_000u64),
            deadline: U256::from(1_700_864_000u64),
            active: true,
            exists: true,
            funded: false,
            cancelled: false,
        }
    }

    #[tokio::test]
    async fn test_refresh_and_lookup() {
        let server = MockServer::start().await;
        let encoded = vec![raw_campaign(0, "Books"), raw_campaign(4, "Wells")].abi_encode();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": format!("0x{}", hex::encode(encoded)),
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let reader = ContractReader::new(&server.uri(), Address::ZERO);
        let book = CampaignBook::new();

        assert_eq!(book.refresh(&reader).await, 2);
        assert_eq!(book.get_by_id(4).await.unwrap().name, "Wells");
        assert!(book.get_by_id(1).await.is_none());
        assert!(book.last_refreshed().await.is_some());

        // second refresh hits the 502 and keeps the list
        assert_eq!(book.refresh(&reader).await, 2);
        assert_eq!(book.all().await.len(), 2);
        assert!(book.last_error().await.is_some());
    }
}
