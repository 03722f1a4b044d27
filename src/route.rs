//! DODO route-service client
//!
//! One GET per swap returns the calldata bundle the executor submits
//! verbatim. The service reports logical failure through a `status`
//! sentinel even on HTTP 200; that case is retried exactly like a
//! transport error.

use crate::config::RouteConfig;
use crate::retry::{retry, RetryError, RetryPolicy};
use crate::{Error, Result};
use alloy::primitives::{Address, Bytes, U256};
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::debug;

/// Status value the route service uses for logical failure.
const STATUS_FAILED: i64 = -1;

/// Transaction payload returned by the route service.
///
/// `value` and `gasLimit` arrive as JSON strings or numbers depending on
/// the route; both encodings are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteData {
    pub to: Address,
    pub data: Bytes,
    #[serde(deserialize_with = "u256_from_number_or_string")]
    pub value: U256,
    #[serde(default, deserialize_with = "opt_u64_from_number_or_string")]
    pub gas_limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    status: i64,
    data: Option<RouteData>,
}

/// HTTP client for the route service. One client per wallet, so the
/// wallet's proxy (when configured) applies to every route fetch.
#[derive(Debug)]
pub struct RouteClient {
    http: reqwest::Client,
    config: RouteConfig,
    chain_id: u64,
    policy: RetryPolicy,
}

impl RouteClient {
    pub fn new(
        config: RouteConfig,
        chain_id: u64,
        policy: RetryPolicy,
        proxy: Option<&str>,
    ) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.http_timeout_secs));
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("invalid proxy {proxy:?}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            config,
            chain_id,
            policy,
        })
    }

    /// Fetch a swap route for `amount` of `from` (smallest units) into `to`.
    ///
    /// The deadline is fixed when the call starts and shared by every retry
    /// attempt.
    pub async fn fetch_route(
        &self,
        from: Address,
        to: Address,
        user: Address,
        amount: U256,
    ) -> Result<RouteData> {
        let deadline = Utc::now().timestamp() as u64 + self.config.deadline_secs;
        let query = self.route_query(from, to, user, amount, deadline);
        debug!(%from, %to, %user, %amount, deadline, "requesting route");

        let client = &*self;
        let query = &query;
        retry(self.policy, "route service", move || client.request(query))
            .await
            .map_err(RetryError::into_inner)
    }

    fn route_query(
        &self,
        from: Address,
        to: Address,
        user: Address,
        amount: U256,
        deadline: u64,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("chainId", self.chain_id.to_string()),
            ("deadLine", deadline.to_string()),
            ("apikey", self.config.api_key.clone()),
            ("slippage", self.config.slippage.to_string()),
            ("source", self.config.source.clone()),
            ("toTokenAddress", to.to_string()),
            ("fromTokenAddress", from.to_string()),
            ("userAddr", user.to_string()),
            ("estimateGas", self.config.estimate_gas.to_string()),
            ("fromAmount", amount.to_string()),
        ]
    }

    async fn request(&self, query: &[(&'static str, String)]) -> Result<RouteData> {
        let response: RouteResponse = self
            .http
            .get(&self.config.endpoint)
            .query(query)
            .send()
            .await?
            .json()
            .await?;
        validate(response)
    }
}

fn validate(response: RouteResponse) -> Result<RouteData> {
    if response.status == STATUS_FAILED {
        return Err(Error::Route(format!(
            "route service returned status {STATUS_FAILED}"
        )));
    }
    response
        .data
        .ok_or_else(|| Error::Route("route response missing data".to_string()))
}

fn u256_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        String(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(U256::from(n)),
        Raw::String(s) => s.trim().parse::<U256>().map_err(serde::de::Error::custom),
    }
}

fn opt_u64_from_number_or_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        String(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
