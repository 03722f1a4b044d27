//! Pharos testnet token table
//!
//! Single source of truth for the addresses the agent touches. The native
//! currency (PHRS) has no contract; the route service identifies it with the
//! usual `0xeee…` sentinel address.

use alloy::primitives::{address, Address};
use std::fmt;

/// Sentinel address the route service uses for the native currency.
pub const NATIVE: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// Token contract addresses on Pharos testnet
pub mod addresses {
    use super::*;

    pub const WBTC: Address = address!("8275c526d1bcec59a31d673929d3ce8d108ff5c7");
    pub const WETH: Address = address!("4e28826d32f1c398ded160dc16ac6873357d048f");
    pub const USDC: Address = address!("72df0bcd7276f2dfbac900d1ce63c272c4bccced");
    pub const USDT: Address = address!("d4071393f8716661958f766df660033b3d35fd29");
    pub const WPHRS: Address = address!("3019b247381c850ab53dc0ee53bce7a07ea9155f");
}

/// The ERC20 tokens the agent tracks and rotates through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSymbol {
    Wbtc,
    Weth,
    Usdc,
    Usdt,
    Wphrs,
}

impl TokenSymbol {
    /// Rotation order of the swap sequence.
    pub const ALL: [TokenSymbol; 5] = [
        TokenSymbol::Wbtc,
        TokenSymbol::Weth,
        TokenSymbol::Usdc,
        TokenSymbol::Usdt,
        TokenSymbol::Wphrs,
    ];

    pub fn address(self) -> Address {
        match self {
            TokenSymbol::Wbtc => addresses::WBTC,
            TokenSymbol::Weth => addresses::WETH,
            TokenSymbol::Usdc => addresses::USDC,
            TokenSymbol::Usdt => addresses::USDT,
            TokenSymbol::Wphrs => addresses::WPHRS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenSymbol::Wbtc => "WBTC",
            TokenSymbol::Weth => "WETH",
            TokenSymbol::Usdc => "USDC",
            TokenSymbol::Usdt => "USDT",
            TokenSymbol::Wphrs => "WPHRS",
        }
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a user-supplied token argument: a known symbol (including PHRS
/// for the native currency) or a raw address.
pub fn resolve(input: &str) -> Option<Address> {
    match input.to_ascii_uppercase().as_str() {
        "PHRS" => Some(NATIVE),
        "WBTC" => Some(addresses::WBTC),
        "WETH" => Some(addresses::WETH),
        "USDC" => Some(addresses::USDC),
        "USDT" => Some(addresses::USDT),
        "WPHRS" => Some(addresses::WPHRS),
        _ => input.parse().ok(),
    }
}
