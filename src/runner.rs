//! Wallet sequencing and the main loop
//!
//! One pass runs every wallet through the same fixed sequence: native into
//! each tracked token, a balance snapshot, 90% of each token back to
//! native, one extra wrap into WPHRS, then native transfers to every
//! recipient. A wallet's failure never stops the pass; the loop pauses
//! between wallets and sleeps four hours between passes.

use crate::accounts::WalletRecord;
use crate::balances::BalanceFetcher;
use crate::config::{AmountRange, Config};
use crate::executor::{wait_for_receipt, SwapExecutor};
use crate::retry::retry;
use crate::route::RouteClient;
use crate::tokens::{self, TokenSymbol};
use crate::wallet::{signing_provider, SecureWallet};
use crate::{Error, Result};
use alloy::network::TransactionBuilder;
use alloy::primitives::{utils::parse_ether, Address, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Draw a fresh random native amount with six decimal places.
pub fn random_native_amount(range: &AmountRange) -> String {
    draw_amount(&mut rand::thread_rng(), range)
}

fn draw_amount<R: Rng>(rng: &mut R, range: &AmountRange) -> String {
    format!("{:.6}", rng.gen_range(range.min..=range.max))
}

/// Integer floor of `balance * 90 / 100`.
pub fn ninety_percent(balance: U256) -> U256 {
    balance * U256::from(90) / U256::from(100)
}

pub struct AgentRunner {
    config: Config,
    wallets: Vec<WalletRecord>,
    recipients: Vec<Address>,
    dry_run: bool,
    once: bool,
}

impl AgentRunner {
    pub fn new(config: Config, wallets: Vec<WalletRecord>, recipients: Vec<Address>) -> Self {
        Self {
            config,
            wallets,
            recipients,
            dry_run: false,
            once: false,
        }
    }

    /// Fetch routes and log operations without submitting anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stop after a single pass instead of looping.
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Run passes until cancelled (or forever).
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        let mut pass = 0u64;
        loop {
            pass += 1;
            info!(pass, wallets = self.wallets.len(), "starting pass");
            for (index, record) in self.wallets.iter().enumerate() {
                if shutdown.is_cancelled() {
                    info!("shutdown requested, stopping");
                    return Ok(());
                }
                if let Err(err) = self.run_wallet(index, record).await {
                    error!(wallet = index + 1, error = %err, "wallet run failed");
                }
                if !pause(&shutdown, self.config.pacing.wallet_pause()).await {
                    info!("shutdown requested, stopping");
                    return Ok(());
                }
            }
            info!(pass, "all wallets completed");
            if self.once {
                return Ok(());
            }
            info!(
                secs = self.config.pacing.pass_pause_secs,
                "sleeping until next pass"
            );
            if !pause(&shutdown, self.config.pacing.pass_pause()).await {
                info!("shutdown requested during sleep, stopping");
                return Ok(());
            }
        }
    }

    async fn run_wallet(&self, index: usize, record: &WalletRecord) -> Result<()> {
        let wallet = SecureWallet::from_hex(&record.private_key)?;
        let provider = signing_provider(&self.config.chain, &wallet)?;
        let routes = RouteClient::new(
            self.config.route.clone(),
            self.config.chain.chain_id,
            self.config.retry.rpc_policy(),
            record.proxy.as_deref(),
        )?;
        let address = wallet.address();

        info!(
            wallet = index + 1,
            address = %address,
            proxy = record.proxy.as_deref().unwrap_or("(none)"),
            "wallet start"
        );

        // 1. Native into each tracked token, a fresh random amount per token.
        for symbol in TokenSymbol::ALL {
            let amount = random_native_amount(&self.config.amounts);
            let wei = parse_ether(&amount)?;
            info!(address = %address, amount = %amount, token = %symbol, "swapping PHRS to token");
            self.swap(
                &provider,
                &routes,
                address,
                tokens::NATIVE,
                symbol.address(),
                wei,
                &format!("PHRS->{symbol}"),
            )
            .await;
        }

        // 2. Snapshot all balances.
        let balances = BalanceFetcher::new(&provider, self.config.retry.rpc_policy())
            .snapshot(address)
            .await;

        // 3. 90% of each token back to native, using the snapshot.
        for symbol in TokenSymbol::ALL {
            let reading = balances.token(symbol);
            if reading.balance().is_zero() {
                info!(address = %address, token = %symbol, "skipping 90% swap, balance is zero");
                continue;
            }
            let amount = ninety_percent(reading.balance());
            if amount.is_zero() {
                info!(address = %address, token = %symbol, "skipping 90% swap, amount rounds to zero");
                continue;
            }
            info!(address = %address, token = %symbol, amount = %amount, "swapping 90% back to PHRS");
            self.swap(
                &provider,
                &routes,
                address,
                symbol.address(),
                tokens::NATIVE,
                amount,
                &format!("90% {symbol}->PHRS"),
            )
            .await;
        }

        // 4. One extra wrap into WPHRS.
        let amount = random_native_amount(&self.config.amounts);
        let wei = parse_ether(&amount)?;
        info!(address = %address, amount = %amount, "swapping PHRS to WPHRS");
        self.swap(
            &provider,
            &routes,
            address,
            tokens::NATIVE,
            TokenSymbol::Wphrs.address(),
            wei,
            "PHRS->WPHRS",
        )
        .await;

        // 5. Native transfers to every recipient.
        info!(address = %address, recipients = self.recipients.len(), "sending PHRS to recipients");
        self.send_native(&provider, address).await;

        info!(address = %address, "wallet finished");
        Ok(())
    }

    /// One routed swap; failures are logged and absorbed so the sequence
    /// continues with the next operation.
    #[allow(clippy::too_many_arguments)]
    async fn swap<P: Provider>(
        &self,
        provider: &P,
        routes: &RouteClient,
        wallet: Address,
        from: Address,
        to: Address,
        amount: U256,
        label: &str,
    ) {
        let result = self
            .try_swap(provider, routes, wallet, from, to, amount, label)
            .await;
        if let Err(err) = result {
            warn!(wallet = %wallet, label, error = %err, "swap failed");
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn try_swap<P: Provider>(
        &self,
        provider: &P,
        routes: &RouteClient,
        wallet: Address,
        from: Address,
        to: Address,
        amount: U256,
        label: &str,
    ) -> Result<()> {
        let route = routes.fetch_route(from, to, wallet, amount).await?;
        if self.dry_run {
            info!(
                wallet = %wallet,
                label,
                to = %route.to,
                value = %route.value,
                "dry run, not submitting"
            );
        } else {
            SwapExecutor::new(
                provider,
                wallet,
                self.config.retry.rpc_policy(),
                self.config.retry.receipt_policy(),
            )
            .execute(&route, label)
            .await?;
        }
        sleep(self.config.pacing.swap_pause()).await;
        Ok(())
    }

    async fn send_native<P: Provider>(&self, provider: &P, wallet: Address) {
        for recipient in &self.recipients {
            let recipient = *recipient;
            let amount = random_native_amount(&self.config.amounts);
            let wei = match parse_ether(&amount) {
                Ok(wei) => wei,
                Err(err) => {
                    warn!(wallet = %wallet, amount = %amount, error = %err, "bad transfer amount");
                    continue;
                }
            };
            if self.dry_run {
                info!(wallet = %wallet, to = %recipient, amount = %amount, "dry run, skipping transfer");
                continue;
            }

            let runner = &*self;
            let amount = amount.as_str();
            let result = retry(
                self.config.retry.rpc_policy(),
                "native transfer",
                move || runner.transfer(provider, wallet, recipient, wei, amount),
            )
            .await;
            if let Err(err) = result {
                warn!(wallet = %wallet, to = %recipient, error = %err, "transfer failed");
            }
        }
    }

    /// Submit one native transfer and wait for its receipt; retried as a
    /// unit by the caller.
    async fn transfer<P: Provider>(
        &self,
        provider: &P,
        wallet: Address,
        to: Address,
        wei: U256,
        display_amount: &str,
    ) -> Result<()> {
        let tx = TransactionRequest::default().with_to(to).with_value(wei);
        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| Error::Rpc(e.to_string()))?;
        let hash = *pending.tx_hash();
        info!(wallet = %wallet, to = %to, amount = %display_amount, tx = %hash, "sent PHRS");
        wait_for_receipt(provider, hash, self.config.retry.receipt_policy()).await?;
        sleep(self.config.pacing.swap_pause()).await;
        Ok(())
    }
}

/// Sleep unless shutdown arrives first; false means stop the loop.
async fn pause(shutdown: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = shutdown.cancelled() => false,
        _ = sleep(duration) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn amounts_stay_in_range_with_six_decimals() {
        let range = AmountRange::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let amount = draw_amount(&mut rng, &range);
            let fraction = amount.split('.').nth(1).expect("decimal point");
            assert_eq!(fraction.len(), 6, "six decimal places: {amount}");
            let value: f64 = amount.parse().unwrap();
            assert!((0.0001..=0.01).contains(&value), "out of range: {amount}");
        }
    }

    #[test]
    fn amounts_parse_as_ether() {
        let range = AmountRange::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let amount = draw_amount(&mut rng, &range);
            let wei = parse_ether(&amount).unwrap();
            assert!(wei > U256::ZERO);
        }
    }

    #[test]
    fn ninety_percent_floors() {
        assert_eq!(ninety_percent(U256::ZERO), U256::ZERO);
        assert_eq!(ninety_percent(U256::from(1)), U256::ZERO);
        assert_eq!(ninety_percent(U256::from(10)), U256::from(9));
        assert_eq!(ninety_percent(U256::from(11)), U256::from(9));
        assert_eq!(ninety_percent(U256::from(100)), U256::from(90));
        assert_eq!(
            ninety_percent(U256::from(1_000_000_000_000_000_000u64)),
            U256::from(900_000_000_000_000_000u64)
        );
    }

    #[tokio::test]
    async fn pause_returns_false_once_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(!pause(&token, Duration::from_secs(3600)).await);
    }

    #[tokio::test]
    async fn pause_completes_short_sleeps() {
        let token = CancellationToken::new();
        assert!(pause(&token, Duration::from_millis(1)).await);
    }
}
