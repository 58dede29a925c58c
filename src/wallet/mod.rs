//! HD Wallet Generation
//!
//! One 12-word mnemonic, one BIP-32 tree, eight chains. The pipeline runs
//! keygen -> derivation -> assembly, and everything above this module works
//! with addresses only; key material stays inside.

pub mod assembler;
pub mod derivation;
pub mod keygen;
pub mod validation;

pub use assembler::{create_hd_wallet, format_wallets_for_db, generate_all_wallets};
pub use derivation::{derive_address, encode_p2pkh_address, keccak256, to_checksum_address};
pub use keygen::generate_mnemonic;
pub use validation::is_valid_mnemonic;
