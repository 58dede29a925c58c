//! Disclosure Sealing with Authenticated Encryption
//!
//! Seals a mnemonic at rest during its disclosure window using:
//! - AES-256-GCM for authenticated encryption
//! - A service-held 256-bit key (no password, no KDF: the key never leaves
//!   the process)
//! - Random nonces to prevent nonce reuse
//!
//! The sealed payload carries the creation timestamp so the reader can
//! cross-check it against the verification event that authorized the read.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use chrono::{DateTime, TimeZone, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{KudiError, KudiResult};

/// Process-held sealing key. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ServiceKey([u8; 32]);

impl ServiceKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random key. Sealed disclosures do not survive a
    /// restart with a regenerated key; that is acceptable, they expire in
    /// minutes anyway.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }
}

/// What actually gets encrypted
#[derive(Serialize, Deserialize)]
struct SealedPayload {
    mnemonic: String,
    created_at: i64,
}

/// Seal a mnemonic and its creation timestamp into an opaque base64 blob
/// (12-byte nonce prepended to the ciphertext).
pub fn seal_mnemonic(
    key: &ServiceKey,
    mnemonic: &str,
    created_at: DateTime<Utc>,
) -> KudiResult<String> {
    let payload = SealedPayload {
        mnemonic: mnemonic.to_string(),
        created_at: created_at.timestamp(),
    };
    let mut plaintext = serde_json::to_vec(&payload)?;

    let mut nonce_bytes = [0u8; 12];
    OsRng.fill_bytes(&mut nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|e| KudiError::crypto_error(format!("Failed to create cipher: {}", e)))?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_slice())
        .map_err(|e| KudiError::crypto_error(format!("Sealing failed: {}", e)))?;
    plaintext.zeroize();

    let mut blob = Vec::with_capacity(12 + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);

    Ok(base64_encode(&blob))
}

/// Open a sealed blob back into the mnemonic and its creation timestamp.
///
/// Any authentication failure (wrong key, bit flip in the blob) comes back
/// as a verification failure, not a parse error.
pub fn open_mnemonic(key: &ServiceKey, blob: &str) -> KudiResult<(String, DateTime<Utc>)> {
    let raw = base64_decode(blob)?;
    if raw.len() < 13 {
        return Err(KudiError::invalid_input("Sealed blob too short"));
    }
    let (nonce_bytes, ciphertext) = raw.split_at(12);

    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|e| KudiError::crypto_error(format!("Failed to create cipher: {}", e)))?;
    let nonce = Nonce::from_slice(nonce_bytes);

    let mut plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| KudiError::verification_failed("Sealed disclosure failed authentication"))?;

    let payload: SealedPayload = serde_json::from_slice(&plaintext)?;
    plaintext.zeroize();

    let created_at = Utc
        .timestamp_opt(payload.created_at, 0)
        .single()
        .ok_or_else(|| KudiError::invalid_input("Sealed timestamp out of range"))?;

    Ok((payload.mnemonic, created_at))
}

fn base64_encode(data: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(data)
}

fn base64_decode(s: &str) -> KudiResult<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(s)
        .map_err(|e| KudiError::parse_error(format!("Invalid base64: {}", e)))
}
