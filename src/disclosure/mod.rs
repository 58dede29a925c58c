//! One-Time Seed Disclosure
//!
//! After wallet creation the mnemonic may be shown to its owner exactly one
//! more time, inside a 10-minute window, and only after a fresh identity
//! verification. The record is sealed at rest, consumed atomically on read,
//! and gone forever afterwards. Recovery from a lost mnemonic goes through
//! reactivation: the user supplies the phrase, we re-derive every address
//! and demand that enough of them match what is on file.

pub mod encryption;
pub mod store;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{KudiError, KudiResult};
use crate::types::WalletRecord;
use crate::wallet;
use crate::{log_info, log_warn};

pub use encryption::ServiceKey;
pub use store::{DisclosureRecord, DisclosureStore, MemoryDisclosureStore, TakeOutcome};

/// Tunable limits for the disclosure protocol
#[derive(Debug, Clone)]
pub struct DisclosureConfig {
    /// How long a stored disclosure stays readable
    pub window: Duration,
    /// Maximum drift allowed between the sealed creation time and the
    /// verification event that authorizes the read
    pub timestamp_tolerance: Duration,
    /// Fraction of on-file addresses a supplied mnemonic must reproduce
    pub reactivation_threshold: f64,
}

impl Default for DisclosureConfig {
    fn default() -> Self {
        Self {
            window: Duration::minutes(10),
            timestamp_tolerance: Duration::minutes(5),
            reactivation_threshold: 0.8,
        }
    }
}

/// Outcome of a successful reactivation check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactivationReport {
    pub matched: usize,
    pub total: usize,
    pub match_ratio: f64,
}

/// Owns the sealing key, the store, and the protocol rules.
pub struct DisclosureManager<S: DisclosureStore> {
    store: S,
    key: ServiceKey,
    config: DisclosureConfig,
}

impl<S: DisclosureStore> DisclosureManager<S> {
    pub fn new(store: S, key: ServiceKey) -> Self {
        Self::with_config(store, key, DisclosureConfig::default())
    }

    pub fn with_config(store: S, key: ServiceKey, config: DisclosureConfig) -> Self {
        Self { store, key, config }
    }

    pub fn config(&self) -> &DisclosureConfig {
        &self.config
    }

    /// Seal a mnemonic for one later read. `verified_at` is the timestamp of
    /// the identity verification that authorized the disclosure; it anchors
    /// both the expiry window and the cross-check at read time. Replaces any
    /// pending disclosure for the same user.
    pub fn store_disclosure(
        &self,
        user_id: &str,
        mnemonic: &str,
        verified_at: DateTime<Utc>,
    ) -> KudiResult<()> {
        if !wallet::is_valid_mnemonic(mnemonic) {
            return Err(KudiError::invalid_mnemonic(
                "Refusing to seal an invalid mnemonic",
            ));
        }

        let ciphertext = encryption::seal_mnemonic(&self.key, mnemonic, verified_at)?;

        self.store.put(
            user_id,
            DisclosureRecord {
                ciphertext,
                expires_at: verified_at + self.config.window,
            },
        );

        log_info!(
            "disclosure",
            "Disclosure sealed",
            user_id = user_id,
            window_minutes = self.config.window.num_minutes()
        );

        Ok(())
    }

    /// The single permitted read. `verified_at` is the timestamp of the
    /// identity verification that authorized this call.
    ///
    /// Returns the mnemonic as individual words; the record is consumed
    /// before decryption, so even a failure further down leaves nothing to
    /// read again.
    pub fn read_disclosure_once(
        &self,
        user_id: &str,
        verified_at: DateTime<Utc>,
    ) -> KudiResult<Vec<String>> {
        let now = Utc::now();

        let record = match self.store.take_live(user_id, now) {
            TakeOutcome::Taken(record) => record,
            TakeOutcome::Expired => {
                return Err(KudiError::disclosure_expired(
                    "Disclosure window has passed",
                ));
            }
            TakeOutcome::Missing => {
                return Err(KudiError::disclosure_not_found(
                    "No pending disclosure for this user",
                ));
            }
        };

        let (mnemonic, created_at) = encryption::open_mnemonic(&self.key, &record.ciphertext)?;
        let mnemonic = Zeroizing::new(mnemonic);

        let drift = (created_at - verified_at).abs();
        if drift > self.config.timestamp_tolerance {
            log_warn!(
                "disclosure",
                "Verification timestamp outside tolerance",
                user_id = user_id,
                drift_seconds = drift.num_seconds()
            );
            return Err(KudiError::verification_failed(
                "Verification event does not match this disclosure",
            ));
        }

        log_info!("disclosure", "Disclosure read and consumed", user_id = user_id);

        Ok(mnemonic.split_whitespace().map(str::to_string).collect())
    }

    /// Prove ownership of an account by re-deriving its wallets from a
    /// supplied mnemonic and comparing addresses against what is on file.
    pub fn reactivate(
        &self,
        user_id: &str,
        mnemonic: &str,
        previous: &[WalletRecord],
    ) -> KudiResult<ReactivationReport> {
        if previous.is_empty() {
            return Err(KudiError::invalid_input(
                "No previous wallet records to compare against",
            ));
        }

        if !wallet::is_valid_mnemonic(mnemonic) {
            return Err(KudiError::invalid_mnemonic(
                "Supplied phrase is not a valid mnemonic",
            ));
        }

        let regenerated = wallet::generate_all_wallets(Some(mnemonic))?;

        let total = previous.len();
        let matched = previous
            .iter()
            .filter(|record| {
                regenerated
                    .values()
                    .any(|w| w.symbol == record.coin_symbol && w.address == record.address)
            })
            .count();

        let match_ratio = matched as f64 / total as f64;

        if match_ratio < self.config.reactivation_threshold {
            log_warn!(
                "disclosure",
                "Reactivation rejected",
                user_id = user_id,
                matched = matched,
                total = total
            );
            return Err(KudiError::reactivation_mismatch(format!(
                "Mnemonic reproduced {:.0}% of addresses, {:.0}% required",
                match_ratio * 100.0,
                self.config.reactivation_threshold * 100.0
            )));
        }

        log_info!(
            "disclosure",
            "Reactivation accepted",
            user_id = user_id,
            matched = matched,
            total = total
        );

        Ok(ReactivationReport {
            matched,
            total,
            match_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const TEST_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn manager() -> DisclosureManager<MemoryDisclosureStore> {
        DisclosureManager::new(MemoryDisclosureStore::new(), ServiceKey::generate())
    }

    #[test]
    fn test_store_then_single_read() {
        let mgr = manager();
        mgr.store_disclosure("u1", TEST_MNEMONIC, Utc::now()).unwrap();

        let words = mgr.read_disclosure_once("u1", Utc::now()).unwrap();
        assert_eq!(words.len(), 12);
        assert_eq!(words.join(" "), TEST_MNEMONIC);

        let second = mgr.read_disclosure_once("u1", Utc::now());
        assert_eq!(second.unwrap_err().code, ErrorCode::DisclosureNotFound);
    }

    #[test]
    fn test_invalid_mnemonic_never_sealed() {
        let mgr = manager();
        let result = mgr.store_disclosure("u1", "not a mnemonic", Utc::now());
        assert_eq!(result.unwrap_err().code, ErrorCode::InvalidMnemonic);
    }

    #[test]
    fn test_expired_disclosure_keeps_reporting_expiry() {
        let mgr = DisclosureManager::with_config(
            MemoryDisclosureStore::new(),
            ServiceKey::generate(),
            DisclosureConfig {
                window: Duration::zero(),
                ..Default::default()
            },
        );
        mgr.store_disclosure("u1", TEST_MNEMONIC, Utc::now()).unwrap();

        let first = mgr.read_disclosure_once("u1", Utc::now());
        assert_eq!(first.unwrap_err().code, ErrorCode::DisclosureExpired);

        let second = mgr.read_disclosure_once("u1", Utc::now());
        assert_eq!(second.unwrap_err().code, ErrorCode::DisclosureExpired);
    }

    #[test]
    fn test_stale_verification_rejected() {
        let mgr = manager();
        mgr.store_disclosure("u1", TEST_MNEMONIC, Utc::now()).unwrap();

        let stale = Utc::now() - Duration::minutes(30);
        let result = mgr.read_disclosure_once("u1", stale);
        assert_eq!(result.unwrap_err().code, ErrorCode::VerificationFailed);
    }

    #[test]
    fn test_reactivation_full_match() {
        let mgr = manager();
        let wallets = wallet::generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();
        let rows = wallet::format_wallets_for_db("u1", &wallets);

        let report = mgr.reactivate("u1", TEST_MNEMONIC, &rows).unwrap();
        assert_eq!(report.matched, report.total);
        assert!((report.match_ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reactivation_wrong_mnemonic_rejected() {
        let mgr = manager();
        let wallets = wallet::generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();
        let rows = wallet::format_wallets_for_db("u1", &wallets);

        let other = "legal winner thank year wave sausage worth useful legal winner thank yellow";
        let result = mgr.reactivate("u1", other, &rows);
        assert_eq!(result.unwrap_err().code, ErrorCode::ReactivationMismatch);
    }

    #[test]
    fn test_reactivation_tolerates_partial_corruption() {
        let mgr = manager();
        let wallets = wallet::generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();
        let mut rows = wallet::format_wallets_for_db("u1", &wallets);

        // One corrupted row out of eight still clears the 80% bar
        rows[0].address = "corrupted".to_string();

        let report = mgr.reactivate("u1", TEST_MNEMONIC, &rows).unwrap();
        assert_eq!(report.matched, 7);
        assert_eq!(report.total, 8);
    }

    #[test]
    fn test_reactivation_needs_records() {
        let mgr = manager();
        let result = mgr.reactivate("u1", TEST_MNEMONIC, &[]);
        assert_eq!(result.unwrap_err().code, ErrorCode::InvalidInput);
    }
}
