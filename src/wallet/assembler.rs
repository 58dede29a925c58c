//! Wallet Set Assembly
//!
//! Drives the full pipeline: mnemonic -> master seed -> key tree -> one
//! address per catalogue coin. A single chain failing is isolated (logged
//! and skipped) so the remaining wallets still come back; only a total
//! failure is an error.

use bip39::Mnemonic;
use bitcoin::secp256k1::Secp256k1;

use crate::error::{KudiError, KudiResult};
use crate::types::{Coin, CoinWallet, WalletRecord, WalletSet};
use crate::wallet::{derivation, keygen};
use crate::{log_info, log_warn};

/// Derive the full wallet set for a mnemonic. `None` generates a fresh one.
pub fn generate_all_wallets(mnemonic_phrase: Option<&str>) -> KudiResult<WalletSet> {
    let phrase = match mnemonic_phrase {
        Some(p) => p.to_string(),
        None => keygen::generate_mnemonic()?,
    };

    let mnemonic = Mnemonic::parse(phrase.as_str())
        .map_err(|e| KudiError::invalid_mnemonic(format!("Invalid mnemonic: {}", e)))?;

    let seed = keygen::derive_master_seed(&mnemonic);
    let master = keygen::build_key_tree(seed.as_ref())?;
    let secp = Secp256k1::new();

    let wallets = assemble_with(|coin| derivation::derive_address(&secp, &master, coin))?;

    log_info!(
        "wallet",
        "Wallet set assembled",
        count = wallets.len(),
        total = Coin::CATALOGUE.len()
    );

    Ok(wallets)
}

/// Run the deriver over the catalogue, isolating per-coin failures.
///
/// Split out so tests can inject a failing deriver without touching key
/// material.
fn assemble_with<F>(mut derive: F) -> KudiResult<WalletSet>
where
    F: FnMut(Coin) -> KudiResult<String>,
{
    let mut wallets = WalletSet::new();

    for coin in Coin::CATALOGUE {
        match derive(coin) {
            Ok(address) => {
                wallets.insert(coin, CoinWallet::new(coin, address));
            }
            Err(e) => {
                log_warn!(
                    "wallet",
                    "Chain derivation failed, skipping coin",
                    coin = coin.symbol(),
                    reason = e
                );
            }
        }
    }

    if wallets.is_empty() {
        return Err(KudiError::wallet_generation(
            "No wallets could be derived for any supported coin",
        ));
    }

    Ok(wallets)
}

/// Generate a fresh mnemonic and the full wallet set in one shot.
///
/// This is the only path that returns a mnemonic to the caller; it must be
/// shown to the user exactly once at creation time.
pub fn create_hd_wallet() -> KudiResult<(String, WalletSet)> {
    let mnemonic = keygen::generate_mnemonic()?;
    let wallets = generate_all_wallets(Some(&mnemonic))?;
    Ok((mnemonic, wallets))
}

/// Flatten a wallet set into persistence rows for one user.
pub fn format_wallets_for_db(user_id: &str, wallets: &WalletSet) -> Vec<WalletRecord> {
    wallets
        .iter()
        .map(|(coin, wallet)| WalletRecord {
            user_id: user_id.to_string(),
            coin_symbol: wallet.symbol.clone(),
            coin_name: wallet.display_name.clone(),
            network: wallet.network.clone(),
            address: wallet.address.clone(),
            derivation_path: wallet.derivation_path.clone(),
            address_index: coin.address_index(),
            is_active: true,
        })
        .collect()
}
