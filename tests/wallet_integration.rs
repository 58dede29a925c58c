//! End-to-end tests across wallet generation and the disclosure protocol

use chrono::{Duration, Utc};

use kudi_core::{
    create_hd_wallet, format_wallets_for_db, generate_all_wallets, is_valid_mnemonic, Coin,
    DisclosureConfig, DisclosureManager, ErrorCode, MemoryDisclosureStore, ServiceKey,
};

const TEST_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn manager() -> DisclosureManager<MemoryDisclosureStore> {
    DisclosureManager::new(MemoryDisclosureStore::new(), ServiceKey::generate())
}

// =============================================================================
// Wallet generation
// =============================================================================

#[test]
fn test_catalogue_is_complete() {
    let wallets = generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();

    let symbols: Vec<&str> = wallets.values().map(|w| w.symbol.as_str()).collect();
    assert_eq!(
        symbols,
        ["BTC", "ETH", "USDT", "USDC", "BNB", "MATIC", "SOL", "DOGE"]
    );
}

#[test]
fn test_derivation_paths_are_stable() {
    let wallets = generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();

    assert_eq!(wallets[&Coin::Btc].derivation_path, "m/44'/0'/0'/0/0");
    assert_eq!(wallets[&Coin::Eth].derivation_path, "m/44'/60'/0'/0/0");
    assert_eq!(wallets[&Coin::Usdt].derivation_path, "m/44'/60'/0'/0/1");
    assert_eq!(wallets[&Coin::Usdc].derivation_path, "m/44'/60'/0'/0/2");
    assert_eq!(wallets[&Coin::Bnb].derivation_path, "m/44'/60'/0'/0/3");
    assert_eq!(wallets[&Coin::Matic].derivation_path, "m/44'/60'/0'/0/4");
    assert_eq!(wallets[&Coin::Sol].derivation_path, "m/44'/501'/0'/0'");
    assert_eq!(wallets[&Coin::Doge].derivation_path, "m/44'/3'/0'/0/0");
}

#[test]
fn test_known_address_vectors() {
    let wallets = generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();

    assert_eq!(
        wallets[&Coin::Btc].address,
        "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA"
    );
    assert_eq!(
        wallets[&Coin::Eth].address,
        "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
    );
    assert_eq!(
        wallets[&Coin::Usdt].address,
        "0x6Fac4D18c912343BF86fa7049364Dd4E424Ab9C0"
    );
}

#[test]
fn test_evm_addresses_are_distinct_and_checksummed() {
    let wallets = generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();
    let evm = [Coin::Eth, Coin::Usdt, Coin::Usdc, Coin::Bnb, Coin::Matic];

    let mut seen = std::collections::HashSet::new();
    for coin in evm {
        let address = &wallets[&coin].address;
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
        // Re-deriving the checksum casing must be a no-op
        let bytes = hex::decode(address[2..].to_lowercase()).unwrap();
        assert_eq!(&kudi_core::to_checksum_address(&bytes), address);
        assert!(seen.insert(address.clone()), "duplicate address for {}", coin);
    }
}

#[test]
fn test_doge_and_sol_address_shapes() {
    use bitcoin::hashes::{sha256d, Hash};

    let wallets = generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();

    let doge = &wallets[&Coin::Doge].address;
    assert!(doge.starts_with('D'));
    let decoded = bs58::decode(doge).into_vec().unwrap();
    assert_eq!(decoded.len(), 25);
    assert_eq!(decoded[0], 30);
    let checksum = sha256d::Hash::hash(&decoded[..21]);
    assert_eq!(&decoded[21..], &checksum[..4]);

    let sol = &wallets[&Coin::Sol].address;
    assert_eq!(bs58::decode(sol).into_vec().unwrap().len(), 32);
}

#[test]
fn test_generation_is_deterministic() {
    let a = generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();
    let b = generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_fresh_wallets_differ_between_users() {
    let (mnemonic_a, wallets_a) = create_hd_wallet().unwrap();
    let (mnemonic_b, wallets_b) = create_hd_wallet().unwrap();

    assert_ne!(mnemonic_a, mnemonic_b);
    assert_ne!(wallets_a[&Coin::Btc].address, wallets_b[&Coin::Btc].address);
}

#[test]
fn test_mnemonic_validation() {
    assert!(is_valid_mnemonic(TEST_MNEMONIC));

    // One substituted word breaks the checksum
    let corrupted = TEST_MNEMONIC.replace("about", "abandon");
    assert!(!is_valid_mnemonic(&corrupted));
}

#[test]
fn test_db_rows_carry_address_indexes() {
    let wallets = generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();
    let rows = format_wallets_for_db("user-7", &wallets);

    assert_eq!(rows.len(), 8);
    let index_of = |symbol: &str| {
        rows.iter()
            .find(|r| r.coin_symbol == symbol)
            .unwrap()
            .address_index
    };
    assert_eq!(index_of("BTC"), 0);
    assert_eq!(index_of("USDT"), 1);
    assert_eq!(index_of("USDC"), 2);
    assert_eq!(index_of("BNB"), 3);
    assert_eq!(index_of("MATIC"), 4);
}

// =============================================================================
// Disclosure protocol
// =============================================================================

#[test]
fn test_disclosure_single_read_lifecycle() {
    let mgr = manager();
    mgr.store_disclosure("alice", TEST_MNEMONIC, Utc::now()).unwrap();

    let words = mgr.read_disclosure_once("alice", Utc::now()).unwrap();
    assert_eq!(words.join(" "), TEST_MNEMONIC);

    // Consumed: a second read finds nothing
    let err = mgr.read_disclosure_once("alice", Utc::now()).unwrap_err();
    assert_eq!(err.code, ErrorCode::DisclosureNotFound);
}

#[test]
fn test_disclosure_expiry_is_terminal_but_visible() {
    let mgr = DisclosureManager::with_config(
        MemoryDisclosureStore::new(),
        ServiceKey::generate(),
        DisclosureConfig {
            window: Duration::zero(),
            ..Default::default()
        },
    );
    mgr.store_disclosure("bob", TEST_MNEMONIC, Utc::now()).unwrap();

    for _ in 0..3 {
        let err = mgr.read_disclosure_once("bob", Utc::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::DisclosureExpired);
    }
}

#[test]
fn test_disclosure_rejects_stale_verification() {
    let mgr = manager();
    mgr.store_disclosure("carol", TEST_MNEMONIC, Utc::now()).unwrap();

    let stale = Utc::now() - Duration::hours(1);
    let err = mgr.read_disclosure_once("carol", stale).unwrap_err();
    assert_eq!(err.code, ErrorCode::VerificationFailed);

    // The record was still consumed by the failed attempt
    let err = mgr.read_disclosure_once("carol", Utc::now()).unwrap_err();
    assert_eq!(err.code, ErrorCode::DisclosureNotFound);
}

#[test]
fn test_disclosure_without_store_is_not_found() {
    let mgr = manager();
    let err = mgr.read_disclosure_once("nobody", Utc::now()).unwrap_err();
    assert_eq!(err.code, ErrorCode::DisclosureNotFound);
}

// =============================================================================
// Reactivation
// =============================================================================

#[test]
fn test_reactivation_with_correct_mnemonic() {
    let mgr = manager();
    let wallets = generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();
    let rows = format_wallets_for_db("dave", &wallets);

    let report = mgr.reactivate("dave", TEST_MNEMONIC, &rows).unwrap();
    assert_eq!(report.matched, 8);
    assert_eq!(report.total, 8);
}

#[test]
fn test_reactivation_with_wrong_mnemonic() {
    let mgr = manager();
    let wallets = generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();
    let rows = format_wallets_for_db("dave", &wallets);

    let other = "legal winner thank year wave sausage worth useful legal winner thank yellow";
    let err = mgr.reactivate("dave", other, &rows).unwrap_err();
    assert_eq!(err.code, ErrorCode::ReactivationMismatch);
}

#[test]
fn test_reactivation_threshold_boundary() {
    let mgr = manager();
    let wallets = generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();
    let mut rows = format_wallets_for_db("erin", &wallets);

    // 7 of 8 matches is 87.5%, above the 80% default
    rows[0].address = "wrong".to_string();
    let report = mgr.reactivate("erin", TEST_MNEMONIC, &rows).unwrap();
    assert_eq!(report.matched, 7);

    // 6 of 8 is 75%, below the bar
    rows[1].address = "also wrong".to_string();
    let err = mgr.reactivate("erin", TEST_MNEMONIC, &rows).unwrap_err();
    assert_eq!(err.code, ErrorCode::ReactivationMismatch);
}

#[test]
fn test_reactivation_with_garbage_phrase() {
    let mgr = manager();
    let wallets = generate_all_wallets(Some(TEST_MNEMONIC)).unwrap();
    let rows = format_wallets_for_db("frank", &wallets);

    let err = mgr.reactivate("frank", "twelve words that are not on the list at all ok ok", &rows);
    assert_eq!(err.unwrap_err().code, ErrorCode::InvalidMnemonic);
}
