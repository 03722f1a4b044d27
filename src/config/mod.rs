//! Configuration for the swap agent
//!
//! Everything the original script kept as module-level constants lives in an
//! immutable [`Config`] that is loaded once at startup and passed explicitly
//! into each component. A JSON config file can override any field; missing
//! fields fall back to the Pharos testnet defaults.

use crate::retry::RetryPolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the RPC endpoint
pub const RPC_URL_ENV: &str = "PHAROS_RPC_URL";

/// Chain connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub rpc_url: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 688_688,
            rpc_url: "https://testnet.dplabs-internal.com".to_string(),
        }
    }
}

/// Route service (DODO route API) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub endpoint: String,
    pub api_key: String,
    /// Slippage tolerance in percent
    pub slippage: f64,
    /// Quote deadline, seconds from the time of the request
    pub deadline_secs: u64,
    pub source: String,
    pub estimate_gas: bool,
    pub http_timeout_secs: u64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.dodoex.io/route-service/v2/widget/getdodoroute".to_string(),
            api_key: "a37546505892e1a952".to_string(),
            slippage: 3.225,
            deadline_secs: 600,
            source: "dodoV2AndMixWasm".to_string(),
            estimate_gas: true,
            http_timeout_secs: 10,
        }
    }
}

/// Retry budgets for network calls and receipt polling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub attempts: u32,
    pub delay_ms: u64,
    pub receipt_attempts: u32,
    pub receipt_delay_ms: u64,
}

impl RetryConfig {
    /// Policy for RPC reads, route fetches, and transaction submission.
    pub fn rpc_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.attempts, Duration::from_millis(self.delay_ms))
    }

    /// Policy for receipt polling.
    pub fn receipt_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.receipt_attempts,
            Duration::from_millis(self.receipt_delay_ms),
        )
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay_ms: 1200,
            receipt_attempts: 20,
            receipt_delay_ms: 4000,
        }
    }
}

/// Pauses between operations, wallets, and passes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub swap_pause_secs: u64,
    pub wallet_pause_secs: u64,
    pub pass_pause_secs: u64,
}

impl PacingConfig {
    pub fn swap_pause(&self) -> Duration {
        Duration::from_secs(self.swap_pause_secs)
    }

    pub fn wallet_pause(&self) -> Duration {
        Duration::from_secs(self.wallet_pause_secs)
    }

    pub fn pass_pause(&self) -> Duration {
        Duration::from_secs(self.pass_pause_secs)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            swap_pause_secs: 1,
            wallet_pause_secs: 2,
            pass_pause_secs: 4 * 60 * 60,
        }
    }
}

/// Range the random native amounts are drawn from, in whole PHRS
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
}

impl Default for AmountRange {
    fn default() -> Self {
        Self {
            min: 0.0001,
            max: 0.01,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chain: ChainConfig,
    pub route: RouteConfig,
    pub retry: RetryConfig,
    pub pacing: PacingConfig,
    pub amounts: AmountRange,
    /// Path of the activity log written by `run`
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            route: RouteConfig::default(),
            retry: RetryConfig::default(),
            pacing: PacingConfig::default(),
            amounts: AmountRange::default(),
            log_file: "faroswap.log".to_string(),
        }
    }
}

impl Config {
    /// Load from a JSON file when given, otherwise use defaults. The
    /// `PHAROS_RPC_URL` environment override applies either way.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("failed to read {}: {}", path.display(), e))
                })?;
                serde_json::from_str(&content).map_err(|e| {
                    Error::Config(format!("failed to parse {}: {}", path.display(), e))
                })?
            }
            None => Config::default(),
        };

        if let Ok(url) = std::env::var(RPC_URL_ENV) {
            config.chain.rpc_url = url;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pharos_testnet() {
        let config = Config::default();
        assert_eq!(config.chain.chain_id, 688_688);
        assert_eq!(config.chain.rpc_url, "https://testnet.dplabs-internal.com");
        assert_eq!(config.retry.attempts, 10);
        assert_eq!(config.retry.delay_ms, 1200);
        assert_eq!(config.retry.receipt_attempts, 20);
        assert_eq!(config.retry.receipt_delay_ms, 4000);
        assert_eq!(config.pacing.pass_pause_secs, 14_400);
        assert_eq!(config.amounts.min, 0.0001);
        assert_eq!(config.amounts.max, 0.01);
        assert_eq!(config.log_file, "faroswap.log");
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let parsed: Config = serde_json::from_str("{}").expect("parse config");
        assert_eq!(parsed.chain.chain_id, Config::default().chain.chain_id);
        assert_eq!(parsed.route.slippage, 3.225);
        assert_eq!(parsed.route.deadline_secs, 600);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let value = serde_json::json!({
            "chain": { "rpc_url": "https://example.org/rpc" },
            "retry": { "attempts": 3 }
        });
        let parsed: Config = serde_json::from_value(value).expect("parse config");
        assert_eq!(parsed.chain.rpc_url, "https://example.org/rpc");
        assert_eq!(parsed.chain.chain_id, 688_688);
        assert_eq!(parsed.retry.attempts, 3);
        assert_eq!(parsed.retry.delay_ms, 1200);
    }

    #[test]
    fn retry_policies_carry_budgets() {
        let retry = RetryConfig::default();
        let rpc = retry.rpc_policy();
        assert_eq!(rpc.attempts, 10);
        assert_eq!(rpc.delay, Duration::from_millis(1200));
        let receipt = retry.receipt_policy();
        assert_eq!(receipt.attempts, 20);
        assert_eq!(receipt.delay, Duration::from_secs(4));
    }
}
