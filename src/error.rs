//! Error types for the swap agent

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Route service error: {0}")]
    Route(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction reverted on-chain: {0}")]
    Reverted(String),

    #[error("No receipt for {0} within the polling budget")]
    ReceiptTimeout(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unit conversion error: {0}")]
    Units(#[from] alloy::primitives::utils::UnitsError),
}

impl Error {
    /// True when resubmitting the same payload cannot succeed.
    pub fn is_revert(&self) -> bool {
        matches!(self, Error::Reverted(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
