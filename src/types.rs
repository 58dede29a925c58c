//! Shared types for Kudi Core
//!
//! All data structures that cross module boundaries are defined here
//! for consistent serialization and FFI compatibility.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Coin Catalogue
// =============================================================================

/// P2PKH version bytes for the Base58Check chains
pub mod version_bytes {
    /// Bitcoin mainnet pubkey-hash prefix ('1' addresses)
    pub const BTC_P2PKH: u8 = 0x00;
    /// Dogecoin pubkey-hash prefix ('D' addresses)
    pub const DOGE_P2PKH: u8 = 30;
    /// Dogecoin script-hash prefix (differs from Bitcoin's 0x05)
    pub const DOGE_P2SH: u8 = 22;
}

/// The fixed catalogue of supported coins.
///
/// A closed enumeration so the assembler's dispatch is exhaustive: adding a
/// coin is one variant plus its data methods below, and the compiler flags
/// every match that needs updating.
///
/// USDT/USDC/BNB/MATIC are distinct address indexes under the same
/// coin-type-60 subtree as ETH. That multiplexing is historical, kept for
/// compatibility with already-issued addresses; on-chain they are all plain
/// EVM addresses and nothing distinguishes them by token.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Coin {
    Btc,
    Eth,
    Usdt,
    Usdc,
    Bnb,
    Matic,
    Sol,
    Doge,
}

/// How a coin's public key becomes an address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeriverFamily {
    /// Version byte + hash160(compressed pubkey) + double-SHA256 checksum,
    /// Base58-encoded
    P2pkh { version: u8 },
    /// Last 20 bytes of Keccak-256(uncompressed pubkey), hex with EIP-55
    /// checksum casing
    Evm,
    /// Child secret bytes as Ed25519 seed, Base58 of the verifying key
    SolanaEd25519,
}

impl Coin {
    /// Every supported coin, in catalogue order
    pub const CATALOGUE: [Coin; 8] = [
        Coin::Btc,
        Coin::Eth,
        Coin::Usdt,
        Coin::Usdc,
        Coin::Bnb,
        Coin::Matic,
        Coin::Sol,
        Coin::Doge,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Coin::Btc => "BTC",
            Coin::Eth => "ETH",
            Coin::Usdt => "USDT",
            Coin::Usdc => "USDC",
            Coin::Bnb => "BNB",
            Coin::Matic => "MATIC",
            Coin::Sol => "SOL",
            Coin::Doge => "DOGE",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Coin::Btc => "Bitcoin",
            Coin::Eth => "Ethereum",
            Coin::Usdt => "Tether USD",
            Coin::Usdc => "USD Coin",
            Coin::Bnb => "BNB",
            Coin::Matic => "Polygon",
            Coin::Sol => "Solana",
            Coin::Doge => "Dogecoin",
        }
    }

    /// Network label stored alongside the address
    pub fn network(&self) -> &'static str {
        match self {
            Coin::Btc => "bitcoin",
            Coin::Eth | Coin::Usdt | Coin::Usdc => "ethereum",
            Coin::Bnb => "bsc",
            Coin::Matic => "polygon",
            Coin::Sol => "solana",
            Coin::Doge => "dogecoin",
        }
    }

    /// Canonical derivation path. Fixed forever: the same mnemonic must
    /// reproduce the same address for this coin on every invocation.
    pub fn derivation_path(&self) -> &'static str {
        match self {
            Coin::Btc => "m/44'/0'/0'/0/0",
            Coin::Eth => "m/44'/60'/0'/0/0",
            Coin::Usdt => "m/44'/60'/0'/0/1",
            Coin::Usdc => "m/44'/60'/0'/0/2",
            Coin::Bnb => "m/44'/60'/0'/0/3",
            Coin::Matic => "m/44'/60'/0'/0/4",
            Coin::Sol => "m/44'/501'/0'/0'",
            Coin::Doge => "m/44'/3'/0'/0/0",
        }
    }

    /// Address-index component of the path (the only thing separating the
    /// EVM-hosted entries)
    pub fn address_index(&self) -> u32 {
        match self {
            Coin::Usdt => 1,
            Coin::Usdc => 2,
            Coin::Bnb => 3,
            Coin::Matic => 4,
            _ => 0,
        }
    }

    pub fn family(&self) -> DeriverFamily {
        match self {
            Coin::Btc => DeriverFamily::P2pkh {
                version: version_bytes::BTC_P2PKH,
            },
            Coin::Doge => DeriverFamily::P2pkh {
                version: version_bytes::DOGE_P2PKH,
            },
            Coin::Eth | Coin::Usdt | Coin::Usdc | Coin::Bnb | Coin::Matic => DeriverFamily::Evm,
            Coin::Sol => DeriverFamily::SolanaEd25519,
        }
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for Coin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BTC" => Ok(Coin::Btc),
            "ETH" => Ok(Coin::Eth),
            "USDT" => Ok(Coin::Usdt),
            "USDC" => Ok(Coin::Usdc),
            "BNB" => Ok(Coin::Bnb),
            "MATIC" => Ok(Coin::Matic),
            "SOL" => Ok(Coin::Sol),
            "DOGE" => Ok(Coin::Doge),
            _ => Err(format!("Unknown coin: {}", s)),
        }
    }
}

// =============================================================================
// Wallet Types
// =============================================================================

/// One derived wallet. Created during assembly, never mutated; regeneration
/// from the same seed recreates it identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinWallet {
    pub symbol: String,
    pub display_name: String,
    pub network: String,
    pub address: String,
    pub derivation_path: String,
}

impl CoinWallet {
    pub fn new(coin: Coin, address: String) -> Self {
        Self {
            symbol: coin.symbol().to_string(),
            display_name: coin.display_name().to_string(),
            network: coin.network().to_string(),
            address,
            derivation_path: coin.derivation_path().to_string(),
        }
    }
}

/// The derived wallets for one mnemonic, keyed by coin. May be a strict
/// subset of the catalogue when individual chain derivations fail.
pub type WalletSet = BTreeMap<Coin, CoinWallet>;

/// Flat row handed to the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub user_id: String,
    pub coin_symbol: String,
    pub coin_name: String,
    pub network: String,
    pub address: String,
    pub derivation_path: String,
    pub address_index: u32,
    pub is_active: bool,
}

/// Wallet creation response: the freshly generated mnemonic plus every
/// wallet derived from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HdWallet {
    pub mnemonic: String,
    pub wallets: WalletSet,
}

// =============================================================================
// API Response Wrapper
// =============================================================================

/// Standard API response wrapper for FFI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<crate::error::KudiError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: crate::error::KudiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"code":"internal","message":"Serialization failed"}}"#
                .to_string()
        })
    }
}
