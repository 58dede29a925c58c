//! Entropy, Mnemonic and Key Tree Generation
//!
//! Turns 128 bits of OS entropy into a 12-word BIP-39 mnemonic, stretches a
//! mnemonic into the 512-bit master seed, and builds the BIP-32 key tree.
//!
//! SECURITY: All sensitive data (entropy, seeds) is zeroized on drop.

use bip39::Mnemonic;
use bitcoin::bip32::Xpriv;
use bitcoin::Network;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{KudiError, KudiResult};

/// Entropy size in bytes: 128 bits = 12 words
const ENTROPY_SIZE: usize = 16;

/// Generate a fresh 12-word mnemonic from OS entropy.
///
/// The output is checksum-validated before it is returned; a failure there
/// means the entropy source or the BIP-39 library is broken, which is fatal
/// for the calling workflow and must never be retried into a weak mnemonic.
pub fn generate_mnemonic() -> KudiResult<String> {
    let mut entropy = Zeroizing::new([0u8; ENTROPY_SIZE]);
    OsRng.fill_bytes(entropy.as_mut());

    let mnemonic = Mnemonic::from_entropy(entropy.as_ref())
        .map_err(|e| KudiError::entropy_encoding(format!("Failed to encode entropy: {}", e)))?;

    let phrase = mnemonic.to_string();

    // Round-trip self-check of our own output
    if Mnemonic::parse(phrase.as_str()).is_err() {
        return Err(KudiError::entropy_encoding(
            "Generated mnemonic failed checksum validation",
        ));
    }

    Ok(phrase)
}

/// Stretch a mnemonic into the 512-bit master seed (BIP-39, empty passphrase)
///
/// SECURITY: The seed is wrapped in Zeroizing; keep it that way at call sites.
pub fn derive_master_seed(mnemonic: &Mnemonic) -> Zeroizing<[u8; 64]> {
    Zeroizing::new(mnemonic.to_seed(""))
}

/// Build the BIP-32 root extended key from a master seed.
///
/// Deterministic: the same seed always yields the same root. Errors here are
/// contract violations (malformed seed length), not recoverable conditions.
pub fn build_key_tree(seed: &[u8]) -> KudiResult<Xpriv> {
    Ok(Xpriv::new_master(Network::Bitcoin, seed)?)
}
