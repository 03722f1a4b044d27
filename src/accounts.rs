//! Wallet and recipient file loading
//!
//! Both inputs are line-oriented text files loaded once at startup. Blank
//! lines are ignored. Wallet lines are `privateKey,proxyUrl` with the proxy
//! optional; recipient lines are one address each, validated at load so a
//! bad line fails before any network traffic.

use crate::{Error, Result};
use alloy::primitives::Address;
use std::path::Path;

/// One line of the wallets file.
///
/// The key is kept as the raw string here; it is only parsed into a signer
/// when the wallet's run starts, so one malformed key skips that wallet
/// instead of aborting startup.
#[derive(Debug, Clone)]
pub struct WalletRecord {
    pub private_key: String,
    pub proxy: Option<String>,
}

pub fn load_wallets(path: &Path) -> Result<Vec<WalletRecord>> {
    let data = read(path)?;
    let mut wallets = Vec::new();
    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, proxy) = match line.split_once(',') {
            Some((key, proxy)) => (key.trim(), proxy.trim()),
            None => (line, ""),
        };
        wallets.push(WalletRecord {
            private_key: key.to_string(),
            proxy: (!proxy.is_empty()).then(|| proxy.to_string()),
        });
    }
    Ok(wallets)
}

pub fn load_recipients(path: &Path) -> Result<Vec<Address>> {
    let data = read(path)?;
    let mut recipients = Vec::new();
    for (index, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let address = line.parse::<Address>().map_err(|e| {
            Error::Config(format!(
                "{}:{}: invalid recipient address: {}",
                path.display(),
                index + 1,
                e
            ))
        })?;
        recipients.push(address);
    }
    Ok(recipients)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn wallets_parse_key_and_proxy() {
        let file = file_with(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80,http://proxy.local:8080\n\
             0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d\n",
        );
        let wallets = load_wallets(file.path()).unwrap();
        assert_eq!(wallets.len(), 2);
        assert_eq!(
            wallets[0].proxy.as_deref(),
            Some("http://proxy.local:8080")
        );
        assert!(wallets[1].proxy.is_none());
        assert!(wallets[1].private_key.starts_with("0x59c"));
    }

    #[test]
    fn wallets_skip_blank_lines_and_trim() {
        let file = file_with("\n  key1 , proxy1 \n\n key2, \n");
        let wallets = load_wallets(file.path()).unwrap();
        assert_eq!(wallets.len(), 2);
        assert_eq!(wallets[0].private_key, "key1");
        assert_eq!(wallets[0].proxy.as_deref(), Some("proxy1"));
        // trailing comma with nothing after it means no proxy
        assert_eq!(wallets[1].private_key, "key2");
        assert!(wallets[1].proxy.is_none());
    }

    #[test]
    fn empty_wallets_file_yields_empty_list() {
        let file = file_with("\n\n");
        assert!(load_wallets(file.path()).unwrap().is_empty());
    }

    #[test]
    fn recipients_parse_and_validate() {
        let file = file_with(
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266\n\n0x70997970C51812dc3A010C7d01b50e0d17dc79C8\n",
        );
        let recipients = load_recipients(file.path()).unwrap();
        assert_eq!(recipients.len(), 2);
    }

    #[test]
    fn bad_recipient_line_is_an_error() {
        let file = file_with("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266\nnot-an-address\n");
        let err = load_recipients(file.path()).unwrap_err();
        assert!(err.to_string().contains(":2:"), "error names the line: {err}");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_wallets(Path::new("/nonexistent/wallets.txt")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
