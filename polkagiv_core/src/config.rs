use std::env;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::Address;

use crate::error::{PolkagivError, PolkagivResult};

pub const DEFAULT_PRICE_FEED_URL: &str = "https://api.coingecko.com/api/v3/simple/price";
pub const DEFAULT_RPC_URL: &str = "https://rpc.api.moonbase.moonbeam.network";
pub const DEFAULT_REFRESH_SECS: u64 = 30;
/// Goals are stored on chain in the stablecoin convention.
pub const DEFAULT_GOAL_DECIMALS: u8 = 6;

#[derive(Debug, Clone)]
pub struct Config {
    pub price_feed_url: String,
    pub price_refresh: Duration,
    pub rpc_url: String,
    pub donor_contract_address: Option<Address>,
    pub usdc_address: Option<Address>,
    pub weth_address: Option<Address>,
    pub wbtc_address: Option<Address>,
    pub goal_decimals: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            price_feed_url: DEFAULT_PRICE_FEED_URL.to_string(),
            price_refresh: Duration::from_secs(DEFAULT_REFRESH_SECS),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            donor_contract_address: None,
            usdc_address: None,
            weth_address: None,
            wbtc_address: None,
            goal_decimals: DEFAULT_GOAL_DECIMALS,
        }
    }
}

impl Config {
    /// Reads the process environment. Missing or malformed addresses are
    /// logged and left unset; malformed numbers are rejected.
    pub fn from_env() -> PolkagivResult<Self> {
        let price_feed_url =
            env::var("PRICE_FEED_URL").unwrap_or_else(|_| DEFAULT_PRICE_FEED_URL.to_string());
        let rpc_url = env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());

        let refresh_secs = parse_number("PRICE_REFRESH_SECS", DEFAULT_REFRESH_SECS)?;
        if refresh_secs == 0 {
            return Err(PolkagivError::Config(
                "PRICE_REFRESH_SECS must be greater than zero".to_string(),
            ));
        }

        let goal_decimals = parse_number("GOAL_DECIMALS", DEFAULT_GOAL_DECIMALS)?;

        Ok(Self {
            price_feed_url,
            price_refresh: Duration::from_secs(refresh_secs),
            rpc_url,
            donor_contract_address: address_var("DONOR_CONTRACT_ADDRESS"),
            usdc_address: address_var("USDC_CONTRACT_ADDRESS"),
            weth_address: address_var("WETH_CONTRACT_ADDRESS"),
            wbtc_address: address_var("WBTC_CONTRACT_ADDRESS"),
            goal_decimals,
        })
    }
}

fn parse_number<T: FromStr>(key: &str, default: T) -> PolkagivResult<T> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| PolkagivError::Config(format!("{} is not a valid number: {}", key, raw))),
        _ => Ok(default),
    }
}

fn address_var(key: &str) -> Option<Address> {
    let raw = env::var(key).ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match Address::from_str(raw) {
        Ok(address) => Some(address),
        Err(e) => {
            log::warn!("{} is not a valid address ({}): {}", key, raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 8] = [
        "PRICE_FEED_URL",
        "PRICE_REFRESH_SECS",
        "RPC_URL",
        "DONOR_CONTRACT_ADDRESS",
        "USDC_CONTRACT_ADDRESS",
        "WETH_CONTRACT_ADDRESS",
        "WBTC_CONTRACT_ADDRESS",
        "GOAL_DECIMALS",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_when_env_is_empty() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.price_feed_url, DEFAULT_PRICE_FEED_URL);
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.price_refresh, Duration::from_secs(30));
        assert_eq!(config.goal_decimals, 6);
        assert!(config.donor_contract_address.is_none());
        assert!(config.usdc_address.is_none());
    }

    #[test]
    #[serial]
    fn test_reads_addresses_and_overrides() {
        clear_env();
        env::set_var("USDC_CONTRACT_ADDRESS", "0x00000000000000000000000000000000000000aa");
        env::set_var("PRICE_REFRESH_SECS", "5");
        env::set_var("PRICE_FEED_URL", "http://localhost:9000/price");

        let config = Config::from_env().unwrap();
        assert_eq!(
            config.usdc_address,
            Some(Address::from_str("0x00000000000000000000000000000000000000aa").unwrap())
        );
        assert_eq!(config.price_refresh, Duration::from_secs(5));
        assert_eq!(config.price_feed_url, "http://localhost:9000/price");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_bad_address_degrades_to_none() {
        clear_env();
        env::set_var("WETH_CONTRACT_ADDRESS", "not-an-address");

        let config = Config::from_env().unwrap();
        assert!(config.weth_address.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_bad_number_is_rejected() {
        clear_env();
        env::set_var("PRICE_REFRESH_SECS", "soon");
        assert!(matches!(Config::from_env(), Err(PolkagivError::Config(_))));

        env::set_var("PRICE_REFRESH_SECS", "0");
        assert!(matches!(Config::from_env(), Err(PolkagivError::Config(_))));

        clear_env();
    }
}
