//! Faroswap Agent CLI
//!
//! Command-line interface for the Pharos testnet swap agent.

use clap::{Parser, Subcommand};
use faroswap_agent::{accounts, journal, AgentRunner, Config, Result};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "faroswap")]
#[command(about = "Automated swap and transfer agent for the Pharos testnet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the swap loop over every wallet
    Run {
        /// Path to the wallets file (`privateKey,proxy` per line)
        #[arg(long, default_value = "wallets.txt")]
        wallets: PathBuf,

        /// Path to the recipients file (one address per line)
        #[arg(long, default_value = "recipients.txt")]
        recipients: PathBuf,

        /// Run a single pass instead of looping
        #[arg(long)]
        once: bool,

        /// Fetch routes and log operations without submitting transactions
        #[arg(long)]
        dry_run: bool,
    },

    /// Fetch a single swap route and print it
    Quote {
        /// Source token (symbol or address)
        #[arg(long)]
        from: String,

        /// Destination token (symbol or address)
        #[arg(long)]
        to: String,

        /// Amount in whole native units (e.g. 0.005)
        #[arg(long)]
        amount: String,

        /// Wallet address the route is quoted for
        #[arg(long, default_value = "0x0000000000000000000000000000000000000000")]
        address: String,
    },

    /// Print balances for an address
    Balances {
        #[arg(long)]
        address: String,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            wallets,
            recipients,
            once,
            dry_run,
        } => {
            journal::init_with_journal(Path::new(&config.log_file), cli.verbose)?;
            run_loop(config, &wallets, &recipients, once, dry_run).await?;
        }
        Commands::Quote {
            from,
            to,
            amount,
            address,
        } => {
            journal::init(cli.verbose);
            run_quote(config, &from, &to, &amount, &address).await?;
        }
        Commands::Balances { address } => {
            journal::init(cli.verbose);
            run_balances(config, &address).await?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn run_loop(
    config: Config,
    wallets_path: &Path,
    recipients_path: &Path,
    once: bool,
    dry_run: bool,
) -> Result<()> {
    use faroswap_agent::Error;

    let wallets = accounts::load_wallets(wallets_path)?;
    if wallets.is_empty() {
        return Err(Error::Config(format!(
            "no wallets found in {}",
            wallets_path.display()
        )));
    }
    let recipients = accounts::load_recipients(recipients_path)?;
    if recipients.is_empty() {
        return Err(Error::Config(format!(
            "no recipients found in {}",
            recipients_path.display()
        )));
    }

    info!(
        wallets = wallets.len(),
        recipients = recipients.len(),
        once,
        dry_run,
        "starting swap agent"
    );

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping at the next pause");
            signal.cancel();
        }
    });

    AgentRunner::new(config, wallets, recipients)
        .dry_run(dry_run)
        .once(once)
        .run(shutdown)
        .await
}

async fn run_quote(
    config: Config,
    from: &str,
    to: &str,
    amount: &str,
    address: &str,
) -> Result<()> {
    use alloy::primitives::{utils::parse_ether, Address};
    use faroswap_agent::route::RouteClient;
    use faroswap_agent::{tokens, Error};

    let from = tokens::resolve(from)
        .ok_or_else(|| Error::Config(format!("unknown source token {from:?}")))?;
    let to = tokens::resolve(to)
        .ok_or_else(|| Error::Config(format!("unknown destination token {to:?}")))?;
    let user: Address = address
        .parse()
        .map_err(|e| Error::Config(format!("invalid address {address:?}: {e}")))?;
    let wei = parse_ether(amount)?;

    let client = RouteClient::new(
        config.route,
        config.chain.chain_id,
        config.retry.rpc_policy(),
        None,
    )?;
    let route = client.fetch_route(from, to, user, wei).await?;
    println!("{}", serde_json::to_string_pretty(&route)?);
    Ok(())
}

async fn run_balances(config: Config, address: &str) -> Result<()> {
    use alloy::primitives::{
        utils::{format_ether, format_units},
        Address,
    };
    use faroswap_agent::balances::BalanceFetcher;
    use faroswap_agent::tokens::TokenSymbol;
    use faroswap_agent::{wallet, Error};

    let address: Address = address
        .parse()
        .map_err(|e| Error::Config(format!("invalid address {address:?}: {e}")))?;

    let provider = wallet::read_provider(&config.chain)?;
    let balances = BalanceFetcher::new(&provider, config.retry.rpc_policy())
        .snapshot(address)
        .await;

    println!("PHRS: {}", format_ether(balances.native.balance()));
    for symbol in TokenSymbol::ALL {
        let reading = balances.token(symbol);
        let display = if reading.is_available() {
            format_units(reading.balance(), reading.decimals())
                .unwrap_or_else(|_| reading.balance().to_string())
        } else {
            "unavailable".to_string()
        };
        println!("{symbol}: {display}");
    }
    Ok(())
}
