//! Disclosure storage
//!
//! At most one pending disclosure per user. The store's only non-trivial
//! contract is `take_live`: a single atomic check-and-remove, so two
//! concurrent readers can never both walk away with the mnemonic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// A sealed mnemonic waiting to be read once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisclosureRecord {
    /// Sealed blob from `encryption::seal_mnemonic`
    pub ciphertext: String,
    /// Hard deadline; at or after this instant the record is dead
    pub expires_at: DateTime<Utc>,
}

/// Result of an atomic read-and-clear attempt
#[derive(Debug)]
pub enum TakeOutcome {
    /// Record was live and has been removed; this caller owns it
    Taken(DisclosureRecord),
    /// Record exists but its window has closed. Left in place so repeated
    /// reads keep reporting expiry rather than absence.
    Expired,
    /// No pending disclosure for this user
    Missing,
}

/// Storage for pending disclosures, one slot per user.
pub trait DisclosureStore: Send + Sync {
    /// Insert or replace the pending disclosure for a user
    fn put(&self, user_id: &str, record: DisclosureRecord);

    /// Atomically remove and return the record if it is still live at `now`
    fn take_live(&self, user_id: &str, now: DateTime<Utc>) -> TakeOutcome;

    /// Drop any record for the user, live or expired
    fn clear(&self, user_id: &str);
}

/// In-process store backed by a mutex-guarded map
#[derive(Default)]
pub struct MemoryDisclosureStore {
    records: Mutex<HashMap<String, DisclosureRecord>>,
}

impl MemoryDisclosureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisclosureStore for MemoryDisclosureStore {
    fn put(&self, user_id: &str, record: DisclosureRecord) {
        let mut records = self.records.lock().unwrap();
        records.insert(user_id.to_string(), record);
    }

    fn take_live(&self, user_id: &str, now: DateTime<Utc>) -> TakeOutcome {
        let mut records = self.records.lock().unwrap();

        let live = match records.get(user_id) {
            None => return TakeOutcome::Missing,
            Some(record) => now < record.expires_at,
        };

        if !live {
            return TakeOutcome::Expired;
        }

        match records.remove(user_id) {
            Some(record) => TakeOutcome::Taken(record),
            None => TakeOutcome::Missing,
        }
    }

    fn clear(&self, user_id: &str) {
        let mut records = self.records.lock().unwrap();
        records.remove(user_id);
    }
}
