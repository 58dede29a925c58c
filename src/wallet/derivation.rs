//! Chain-Specific Address Derivation
//!
//! Walks the BIP-32 tree at each coin's canonical path and encodes the child
//! key into that chain's native address format. Three families:
//!
//! - P2PKH (BTC, DOGE): version byte + hash160 + double-SHA256 checksum,
//!   Base58-encoded. The two chains differ only in the version byte.
//! - EVM (ETH, USDT, USDC, BNB, MATIC): last 20 bytes of the Keccak-256 of
//!   the uncompressed public key, hex with EIP-55 checksum casing. One
//!   deriver, five address indexes under the coin-type-60 subtree.
//! - Solana (SOL): child secret bytes as an Ed25519 seed, address is the
//!   Base58 of the verifying key (no checksum wrapper).
//!
//! SECURITY: private child keys never leave this module; only addresses do.

use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::hashes::{hash160, sha256d, Hash};
use bitcoin::secp256k1::{All, Secp256k1};
use ed25519_dalek::SigningKey;
use std::str::FromStr;
use tiny_keccak::{Hasher, Keccak};

use crate::error::{KudiError, KudiResult};
use crate::types::{Coin, DeriverFamily};

/// Derive the address for one coin from the root key.
///
/// Any cryptographic or encoding failure comes back as a
/// `ChainDerivation` error carrying the coin symbol; the assembler decides
/// whether to isolate or surface it.
pub fn derive_address(secp: &Secp256k1<All>, master: &Xpriv, coin: Coin) -> KudiResult<String> {
    derive_address_inner(secp, master, coin)
        .map_err(|e| KudiError::chain_derivation(coin.symbol(), e))
}

fn derive_address_inner(
    secp: &Secp256k1<All>,
    master: &Xpriv,
    coin: Coin,
) -> KudiResult<String> {
    let path = DerivationPath::from_str(coin.derivation_path())?;
    let child = master.derive_priv(secp, &path)?;
    let secret_key = child.private_key;

    match coin.family() {
        DeriverFamily::P2pkh { version } => {
            let compressed = secret_key.public_key(secp).serialize();
            Ok(encode_p2pkh_address(version, &compressed))
        }
        DeriverFamily::Evm => {
            let uncompressed = secret_key.public_key(secp).serialize_uncompressed();
            // Skip the 0x04 prefix byte before hashing
            let digest = keccak256(&uncompressed[1..]);
            Ok(to_checksum_address(&digest[12..]))
        }
        DeriverFamily::SolanaEd25519 => {
            let signing_key = SigningKey::from_bytes(&secret_key.secret_bytes());
            let public_key = signing_key.verifying_key().to_bytes();
            Ok(bs58::encode(public_key).into_string())
        }
    }
}

/// Encode a P2PKH address: version byte + hash160(pubkey) + checksum
pub fn encode_p2pkh_address(version: u8, compressed_pubkey: &[u8]) -> String {
    let pubkey_hash = hash160::Hash::hash(compressed_pubkey);

    let mut payload = Vec::with_capacity(25);
    payload.push(version);
    payload.extend_from_slice(pubkey_hash.as_ref());

    let checksum = sha256d::Hash::hash(&payload);
    payload.extend_from_slice(&checksum[..4]);

    bs58::encode(payload).into_string()
}

/// Keccak-256 digest
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Hex-encode 20 address bytes with EIP-55 checksum casing
pub fn to_checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::from("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_digit() {
            result.push(ch);
        } else if nibble >= 8 {
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push(ch);
        }
    }

    result
}
