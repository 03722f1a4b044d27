//! Swap execution
//!
//! Submits a routed swap and confirms it by polling for the receipt
//! manually. Reverts are never resubmitted; a swap whose receipt never
//! arrives is abandoned without spending further submission attempts.
//! Transient submission errors resend the same route payload.

use crate::retry::{retry_classified, ErrorClass, RetryError, RetryPolicy};
use crate::route::RouteData;
use crate::{Error, Result};
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use tokio::time::sleep;
use tracing::{info, warn};

/// Gas limit used when the route omits one.
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

pub struct SwapExecutor<'a, P> {
    provider: &'a P,
    wallet: Address,
    submit_policy: RetryPolicy,
    receipt_policy: RetryPolicy,
}

impl<'a, P: Provider> SwapExecutor<'a, P> {
    pub fn new(
        provider: &'a P,
        wallet: Address,
        submit_policy: RetryPolicy,
        receipt_policy: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            wallet,
            submit_policy,
            receipt_policy,
        }
    }

    /// Run one routed swap to completion. The same payload is resubmitted
    /// on transient submission errors; a revert or an exhausted receipt
    /// poll ends the swap on the spot.
    pub async fn execute(&self, route: &RouteData, label: &str) -> Result<()> {
        let executor = &*self;
        retry_classified(
            self.submit_policy,
            label,
            swap_error_class,
            move || executor.attempt(route, label),
        )
        .await
        .map_err(RetryError::into_inner)
    }

    async fn attempt(&self, route: &RouteData, label: &str) -> Result<()> {
        let hash = self.submit(route).await?;
        info!(wallet = %self.wallet, label, tx = %hash, "swap transaction sent");
        self.confirm(hash, label).await
    }

    async fn submit(&self, route: &RouteData) -> Result<TxHash> {
        let tx = TransactionRequest::default()
            .with_to(route.to)
            .with_input(route.data.clone())
            .with_value(route.value)
            .with_gas_limit(route.gas_limit.unwrap_or(DEFAULT_GAS_LIMIT));
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| classify_send_error(&e.to_string()))?;
        Ok(*pending.tx_hash())
    }

    async fn confirm(&self, hash: TxHash, label: &str) -> Result<()> {
        let receipt = match wait_for_receipt(self.provider, hash, self.receipt_policy).await {
            Ok(receipt) => receipt,
            Err(err) => {
                // No receipt after the polling budget: give up on this swap
                // rather than submitting the payload again blind.
                warn!(wallet = %self.wallet, label, tx = %hash, "receipt never arrived, abandoning swap");
                return Err(err);
            }
        };
        if !receipt.status() {
            warn!(wallet = %self.wallet, label, tx = %hash, "transaction reverted on-chain, not retrying");
            return Err(Error::Reverted(hash.to_string()));
        }
        info!(wallet = %self.wallet, label, tx = %hash, "transaction confirmed");
        Ok(())
    }
}

/// Poll for a transaction receipt at a fixed cadence. Poll errors are
/// logged and polling continues; running out of polls is an error.
pub async fn wait_for_receipt<P: Provider>(
    provider: &P,
    hash: TxHash,
    policy: RetryPolicy,
) -> Result<TransactionReceipt> {
    let attempts = policy.attempts.max(1);
    for attempt in 1..=attempts {
        match provider.get_transaction_receipt(hash).await {
            Ok(Some(receipt)) => return Ok(receipt),
            Ok(None) => {}
            Err(err) => warn!(tx = %hash, attempt, error = %err, "receipt poll failed"),
        }
        if attempt < attempts {
            sleep(policy.delay).await;
        }
    }
    Err(Error::ReceiptTimeout(hash.to_string()))
}

/// A revert can only fail the same way again, and a swap whose receipt
/// never arrived may still land later; neither earns another submission.
fn swap_error_class(err: &Error) -> ErrorClass {
    if err.is_revert() || matches!(err, Error::ReceiptTimeout(_)) {
        ErrorClass::Terminal
    } else {
        ErrorClass::Transient
    }
}

/// Sort a submission failure into revert (terminal) or transient RPC
/// trouble.
fn classify_send_error(message: &str) -> Error {
    let lower = message.to_lowercase();
    if lower.contains("revert") || lower.contains("call exception") {
        Error::Reverted(message.to_string())
    } else {
        Error::Rpc(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_messages_are_terminal() {
        assert!(classify_send_error("execution reverted: K").is_revert());
        assert!(classify_send_error("VM Exception: REVERT").is_revert());
        assert!(classify_send_error("server returned CALL EXCEPTION").is_revert());
    }

    #[test]
    fn other_messages_stay_transient() {
        assert!(!classify_send_error("connection reset by peer").is_revert());
        assert!(!classify_send_error("nonce too low").is_revert());
        assert!(!classify_send_error("gateway timeout").is_revert());
    }

    #[test]
    fn reverts_and_receipt_timeouts_stop_the_swap() {
        let revert = Error::Reverted("0xabc".to_string());
        assert_eq!(swap_error_class(&revert), ErrorClass::Terminal);
        let timeout = Error::ReceiptTimeout("0xabc".to_string());
        assert_eq!(swap_error_class(&timeout), ErrorClass::Terminal);
    }

    #[test]
    fn rpc_failures_earn_another_submission() {
        let rpc = Error::Rpc("connection refused".to_string());
        assert_eq!(swap_error_class(&rpc), ErrorClass::Transient);
        let route = Error::Route("status -1".to_string());
        assert_eq!(swap_error_class(&route), ErrorClass::Transient);
    }

    #[test]
    fn default_gas_limit_matches_route_fallback() {
        let route: RouteData = serde_json::from_str(
            r#"{"to": "0x3019b247381c850ab53dc0ee53bce7a07ea9155f", "data": "0x", "value": 0}"#,
        )
        .unwrap();
        assert_eq!(route.gas_limit.unwrap_or(DEFAULT_GAS_LIMIT), 300_000);
    }
}
