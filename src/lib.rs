//! Kudi Core - HD Wallet Generation and One-Time Seed Disclosure
//!
//! The key-handling core of the Kudi backend. One 12-word BIP-39 mnemonic
//! deterministically yields an address for every supported chain (BTC, ETH,
//! USDT, USDC, BNB, MATIC, SOL, DOGE), and a strictly single-read,
//! time-boxed disclosure protocol governs the only moment the mnemonic may
//! ever be shown again.
//!
//! # Architecture
//! - `wallet`: entropy, mnemonic, BIP-32 tree, per-chain address derivation
//! - `disclosure`: sealed storage, one-time read, reactivation by re-derivation
//! - `ffi`: C-ABI surface (JSON in, JSON out)
//! - `error`: unified error type with FFI-safe codes
//!
//! # Security
//! - Entropy and seeds are zeroized on drop
//! - Mnemonics are sealed with AES-256-GCM while awaiting disclosure
//! - Logging redacts sensitive fields by key name

pub mod disclosure;
pub mod error;
pub mod ffi;
pub mod types;
pub mod utils;
pub mod wallet;

pub use error::{ErrorCode, KudiError, KudiResult};
pub use types::{ApiResponse, Coin, CoinWallet, DeriverFamily, HdWallet, WalletRecord, WalletSet};

pub use wallet::{
    create_hd_wallet, derive_address, encode_p2pkh_address, format_wallets_for_db,
    generate_all_wallets, generate_mnemonic, is_valid_mnemonic, keccak256, to_checksum_address,
};

pub use disclosure::{
    DisclosureConfig, DisclosureManager, DisclosureRecord, DisclosureStore, MemoryDisclosureStore,
    ReactivationReport, ServiceKey, TakeOutcome,
};
