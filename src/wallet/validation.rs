//! Mnemonic validation
//!
//! Wraps BIP-39 parsing (word list membership, word count, checksum) behind
//! a boolean predicate for callers that only need a yes/no answer.

use bip39::Mnemonic;

/// Check whether a phrase is a well-formed BIP-39 mnemonic.
///
/// Whitespace is normalized by the parser, so extra spacing does not fail
/// an otherwise valid phrase.
pub fn is_valid_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse(phrase).is_ok()
}
