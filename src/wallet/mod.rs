//! Wallet and provider construction
//!
//! Private keys live in [`SecureWallet`]; providers are built per wallet
//! against the single configured RPC endpoint. RPC traffic always goes
//! direct; a wallet's proxy only applies to route-service HTTP calls.

mod signer;

pub use signer::SecureWallet;

use crate::config::ChainConfig;
use crate::{Error, Result};
use alloy::providers::{Provider, ProviderBuilder};
use url::Url;

/// Read-only provider for balance and receipt queries.
pub fn read_provider(chain: &ChainConfig) -> Result<impl Provider + Clone> {
    let url = parse_rpc_url(&chain.rpc_url)?;
    Ok(ProviderBuilder::new().connect_http(url))
}

/// Provider that fills and signs transactions with the wallet's key.
pub fn signing_provider(
    chain: &ChainConfig,
    wallet: &SecureWallet,
) -> Result<impl Provider + Clone> {
    let url = parse_rpc_url(&chain.rpc_url)?;
    Ok(ProviderBuilder::new()
        .wallet(wallet.wallet().clone())
        .connect_http(url))
}

fn parse_rpc_url(raw: &str) -> Result<Url> {
    raw.parse()
        .map_err(|e| Error::Config(format!("invalid RPC URL {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rpc_url_parses() {
        assert!(parse_rpc_url(&ChainConfig::default().rpc_url).is_ok());
    }

    #[test]
    fn bad_rpc_url_is_a_config_error() {
        let err = parse_rpc_url("not a url").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
