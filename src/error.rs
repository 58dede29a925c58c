//! Unified error types for Kudi Core
//!
//! All errors flow through this module for consistent handling
//! and FFI-safe error reporting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all Kudi operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KudiError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl KudiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    /// The entropy source or mnemonic library misbehaved. Fatal for the
    /// calling workflow; never retried.
    pub fn entropy_encoding(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::EntropyEncoding, msg)
    }

    pub fn invalid_mnemonic(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidMnemonic, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    /// A single chain's derivation failed. Caught by the wallet set
    /// assembler; the coin symbol goes in the message, the cause in details.
    pub fn chain_derivation(coin: &str, cause: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ChainDerivation,
            format!("Address derivation failed for {}", coin),
        )
        .with_details(cause.to_string())
    }

    pub fn wallet_generation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::WalletGeneration, msg)
    }

    pub fn disclosure_expired(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DisclosureExpired, msg)
    }

    pub fn disclosure_not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DisclosureNotFound, msg)
    }

    pub fn reactivation_mismatch(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ReactivationMismatch, msg)
    }

    pub fn verification_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::VerificationFailed, msg)
    }

    pub fn crypto_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CryptoError, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for KudiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for KudiError {}

/// Error codes for categorization
///
/// Fatal/environment: `EntropyEncoding`. Input validation:
/// `InvalidMnemonic`, `InvalidInput`, `ReactivationMismatch`.
/// Partial/isolated: `ChainDerivation` (never surfaces past the assembler
/// unless every coin fails, which becomes `WalletGeneration`). Terminal
/// user-visible states: `DisclosureExpired`, `DisclosureNotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Fatal/environment errors
    EntropyEncoding,

    // Input errors
    InvalidInput,
    InvalidMnemonic,
    ReactivationMismatch,

    // Derivation errors
    ChainDerivation,
    WalletGeneration,

    // Disclosure protocol terminal states
    DisclosureExpired,
    DisclosureNotFound,

    // Crypto errors
    CryptoError,
    VerificationFailed,

    // Parse errors
    ParseError,
    JsonError,

    // Internal
    Internal,
}

/// Result type alias for Kudi operations
pub type KudiResult<T> = Result<T, KudiError>;

// Conversions from common error types

impl From<serde_json::Error> for KudiError {
    fn from(e: serde_json::Error) -> Self {
        KudiError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for KudiError {
    fn from(e: hex::FromHexError) -> Self {
        KudiError::new(ErrorCode::ParseError, e.to_string())
    }
}

impl From<bitcoin::bip32::Error> for KudiError {
    fn from(e: bitcoin::bip32::Error) -> Self {
        KudiError::new(ErrorCode::CryptoError, format!("BIP32 error: {}", e))
    }
}

impl From<bitcoin::secp256k1::Error> for KudiError {
    fn from(e: bitcoin::secp256k1::Error) -> Self {
        KudiError::new(ErrorCode::CryptoError, format!("Secp256k1 error: {}", e))
    }
}

impl From<bip39::Error> for KudiError {
    fn from(e: bip39::Error) -> Self {
        KudiError::new(ErrorCode::InvalidMnemonic, format!("BIP39 error: {}", e))
    }
}
