use log::{debug, warn};
use reqwest::Client;

use crate::error::{PolkagivError, PolkagivResult};
use crate::prices::dto::{fallback_prices, PriceMap};

#[derive(Clone)]
pub struct PriceFeedClient {
    client: Client,
    base_url: String,
}

impl PriceFeedClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::new();

        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    pub async fn fetch_prices(&self, ids: &[String]) -> PolkagivResult<PriceMap> {
        let ids = ids.join(",");
        debug!("🌐 Fetching prices for [{}] from {}", ids, self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("ids", ids.as_str()),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
                ("include_last_updated_at", "true"),
            ])
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            return Err(PolkagivError::PriceFeed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let prices: PriceMap = response.json().await?;
        debug!("📡 Received {} prices", prices.len());

        Ok(prices)
    }

    /// Never fails: any error yields the fallback table.
    pub async fn fetch_prices_or_fallback(&self, ids: &[String]) -> PriceMap {
        match self.fetch_prices(ids).await {
            Ok(prices) => prices,
            Err(e) => {
                warn!("⚠️ Price feed unavailable, using fallback prices: {}", e);
                fallback_prices()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ids() -> Vec<String> {
        vec!["usd-coin".to_string(), "weth".to_string()]
    }

    #[tokio::test]
    async fn test_fetch_prices_parses_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("ids", "usd-coin,weth"))
            .and(query_param("vs_currencies", "usd"))
            .and(query_param("include_24hr_change", "true"))
            .and(query_param("include_last_updated_at", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "usd-coin": { "usd": 0.9998, "usd_24h_change": -0.01, "last_updated_at": 1_700_000_000 },
                "weth": { "usd": 3500.5, "usd_24h_change": 1.5, "last_updated_at": 1_700_000_010 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PriceFeedClient::new(&server.uri());
        let prices = client.fetch_prices(&ids()).await.unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices["weth"].usd, 3500.5);
        assert_eq!(prices["usd-coin"].last_updated_at, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_fetch_prices_tolerates_missing_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "weth": { "usd": 3000.0 },
                "usd-coin": {}
            })))
            .mount(&server)
            .await;

        let client = PriceFeedClient::new(&server.uri());
        let prices = client.fetch_prices(&ids()).await.unwrap();

        assert_eq!(prices["weth"].usd_24h_change, 0.0);
        assert_eq!(prices["usd-coin"].usd, 0.0);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = PriceFeedClient::new(&server.uri());
        let result = client.fetch_prices(&ids()).await;

        assert!(matches!(result, Err(PolkagivError::PriceFeed(msg)) if msg.contains("rate limited")));
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_static_table() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = PriceFeedClient::new(&server.uri());
        let prices = client.fetch_prices_or_fallback(&ids()).await;

        assert_eq!(prices["usd-coin"].usd, 1.0);
        assert_eq!(prices["weth"].usd, 3213.0);
        assert_eq!(prices["wrapped-bitcoin"].usd, 110_464.0);
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = PriceFeedClient::new(&server.uri());
        assert!(client.fetch_prices(&ids()).await.is_err());

        let prices = client.fetch_prices_or_fallback(&ids()).await;
        assert_eq!(prices["weth"].usd, 3213.0);
    }
}
