//! Faroswap Agent
//!
//! An unattended agent that cycles swaps and native transfers across a set
//! of wallets on the Pharos testnet:
//! - Routes every swap through the DODO route-service API
//! - Submits and confirms transactions over a single JSON-RPC endpoint
//! - Retries every network call on a fixed budget; balance reads degrade to
//!   typed fallbacks instead of failing a pass
//!
//! # Security Model
//!
//! - Private keys are parsed once per wallet and live only inside the
//!   wallet module's signer
//! - Keys are never serialized, logged, or exposed through `Debug`
//! - The route service only ever sees public addresses

pub mod accounts;
pub mod balances;
pub mod config;
pub mod executor;
pub mod journal;
pub mod retry;
pub mod route;
pub mod runner;
pub mod tokens;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use runner::AgentRunner;
