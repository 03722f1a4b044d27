//! Wallet balance snapshot
//!
//! Reads are best-effort: a token that cannot be read after the retry
//! budget is recorded as a typed [`TokenReading::Unavailable`] marker
//! rather than failing the pass. The marker reads as zero balance with
//! 18 decimals wherever a value is needed.

use crate::retry::{retry, RetryPolicy};
use crate::tokens::TokenSymbol;
use alloy::primitives::{
    utils::{format_ether, format_units},
    Address, U256,
};
use alloy::providers::Provider;
use alloy::sol;
use futures::future;
use std::collections::HashMap;
use tracing::{info, warn};

sol! {
    #[sol(rpc)]
    contract IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

/// A balance read that either succeeded or degraded to a typed marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenReading {
    Available { balance: U256, decimals: u8 },
    Unavailable,
}

impl TokenReading {
    /// Decimals assumed for a token whose metadata could not be read.
    pub const FALLBACK_DECIMALS: u8 = 18;

    pub fn balance(&self) -> U256 {
        match self {
            TokenReading::Available { balance, .. } => *balance,
            TokenReading::Unavailable => U256::ZERO,
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            TokenReading::Available { decimals, .. } => *decimals,
            TokenReading::Unavailable => Self::FALLBACK_DECIMALS,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TokenReading::Available { .. })
    }
}

/// Native plus per-token readings for one wallet. Always complete: every
/// tracked symbol has an entry, unreachable ones as `Unavailable`.
#[derive(Debug, Clone)]
pub struct WalletBalances {
    pub native: TokenReading,
    pub tokens: HashMap<TokenSymbol, TokenReading>,
}

impl WalletBalances {
    pub fn token(&self, symbol: TokenSymbol) -> TokenReading {
        self.tokens
            .get(&symbol)
            .copied()
            .unwrap_or(TokenReading::Unavailable)
    }
}

/// Best-effort balance reader over one provider.
pub struct BalanceFetcher<'a, P> {
    provider: &'a P,
    policy: RetryPolicy,
}

impl<'a, P: Provider> BalanceFetcher<'a, P> {
    pub fn new(provider: &'a P, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Snapshot every tracked balance for `address`. Never fails.
    pub async fn snapshot(&self, address: Address) -> WalletBalances {
        let native = self.read_native(address).await;
        let mut tokens = HashMap::new();
        for symbol in TokenSymbol::ALL {
            tokens.insert(symbol, self.read_token(address, symbol).await);
        }
        WalletBalances { native, tokens }
    }

    async fn read_native(&self, address: Address) -> TokenReading {
        let provider = self.provider;
        let result = retry(self.policy, "native balance", move || async move {
            provider.get_balance(address).await
        })
        .await;
        match result {
            Ok(balance) => {
                info!(wallet = %address, balance = %format_ether(balance), "PHRS balance");
                TokenReading::Available {
                    balance,
                    decimals: 18,
                }
            }
            Err(err) => {
                warn!(wallet = %address, error = %err, "PHRS balance unavailable, using zero");
                TokenReading::Unavailable
            }
        }
    }

    async fn read_token(&self, address: Address, symbol: TokenSymbol) -> TokenReading {
        let contract = IERC20::new(symbol.address(), self.provider);
        let token = &contract;
        // Balance and decimals go out together; both must land for the
        // reading to count.
        let (balance, decimals) = future::join(
            retry(self.policy, symbol.as_str(), move || async move {
                token.balanceOf(address).call().await
            }),
            retry(self.policy, symbol.as_str(), move || async move {
                token.decimals().call().await
            }),
        )
        .await;

        match (balance, decimals) {
            (Ok(balance), Ok(decimals)) => {
                let display_value = format_units(balance, decimals)
                    .unwrap_or_else(|_| balance.to_string());
                info!(wallet = %address, token = %symbol, balance = %display_value, "token balance");
                TokenReading::Available { balance, decimals }
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(
                    wallet = %address,
                    token = %symbol,
                    error = %err,
                    "token read unavailable, substituting zero"
                );
                TokenReading::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_reads_as_zero_with_default_decimals() {
        let reading = TokenReading::Unavailable;
        assert_eq!(reading.balance(), U256::ZERO);
        assert_eq!(reading.decimals(), 18);
        assert!(!reading.is_available());
    }

    #[test]
    fn available_exposes_its_values() {
        let reading = TokenReading::Available {
            balance: U256::from(1234),
            decimals: 6,
        };
        assert_eq!(reading.balance(), U256::from(1234));
        assert_eq!(reading.decimals(), 6);
        assert!(reading.is_available());
    }

    #[test]
    fn missing_symbol_defaults_to_unavailable() {
        let balances = WalletBalances {
            native: TokenReading::Unavailable,
            tokens: HashMap::new(),
        };
        assert_eq!(balances.token(TokenSymbol::Usdc), TokenReading::Unavailable);
    }
}
