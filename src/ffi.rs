//! FFI Layer for Kudi Core
//!
//! All C-ABI exports are defined here. This is the ONLY file that should
//! contain `extern "C"` functions. All functions follow a consistent pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `kudi_free_string`)
//!
//! Error handling: All functions return JSON with `success` field.
//! On error, `success: false` and `error` object is populated.
//!
//! The disclosure protocol is deliberately absent here: it needs a live
//! verification event and server-held state, so it is exposed through the
//! `DisclosureManager` API, not over the C boundary.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::error::KudiError;
use crate::types::{ApiResponse, HdWallet};
use crate::wallet;

// =============================================================================
// Memory Management
// =============================================================================

/// Free a string returned by any kudi_* function
///
/// # Safety
/// The pointer must have been returned by a kudi_* function
#[unsafe(no_mangle)]
pub extern "C" fn kudi_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(s);
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Convert C string to an owned Rust string, returning error JSON if invalid
fn parse_input(input: *const c_char) -> Result<String, *mut c_char> {
    if input.is_null() {
        return Err(error_response(KudiError::invalid_input("Null input pointer")));
    }

    let c_str = unsafe { CStr::from_ptr(input) };
    match c_str.to_str() {
        Ok(s) => Ok(s.to_string()),
        Err(_) => Err(error_response(KudiError::invalid_input("Invalid UTF-8 string"))),
    }
}

/// Create a success response JSON string
fn success_response<T: serde::Serialize>(data: T) -> *mut c_char {
    let response = ApiResponse::ok(data);
    string_to_ptr(response.to_json())
}

/// Create an error response JSON string
fn error_response(error: KudiError) -> *mut c_char {
    let response: ApiResponse<()> = ApiResponse::err(error);
    string_to_ptr(response.to_json())
}

/// Convert Rust string to C string pointer
fn string_to_ptr(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => {
            // Last resort: return a minimal error
            CString::new(r#"{"success":false,"error":{"code":"internal","message":"String conversion failed"}}"#)
                .unwrap()
                .into_raw()
        }
    }
}

// =============================================================================
// Wallet Operations
// =============================================================================

/// Generate a new wallet: fresh mnemonic plus an address for every
/// supported coin
///
/// # Input
/// None
///
/// # Output
/// ```json
/// {
///   "success": true,
///   "data": {
///     "mnemonic": "word1 word2 ...",
///     "wallets": { "BTC": {...}, "ETH": {...}, ... }
///   }
/// }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn kudi_generate_wallet() -> *mut c_char {
    match wallet::create_hd_wallet() {
        Ok((mnemonic, wallets)) => success_response(HdWallet { mnemonic, wallets }),
        Err(e) => error_response(e),
    }
}

/// Re-derive the full wallet set from an existing mnemonic
///
/// # Input
/// ```json
/// { "mnemonic": "word1 word2 ..." }
/// ```
///
/// # Output
/// ```json
/// {
///   "success": true,
///   "data": { "BTC": {...}, "ETH": {...}, ... }
/// }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn kudi_generate_all_wallets(input: *const c_char) -> *mut c_char {
    let json_str = match parse_input(input) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    #[derive(serde::Deserialize)]
    struct GenerateRequest {
        mnemonic: String,
    }

    let request: GenerateRequest = match serde_json::from_str(&json_str) {
        Ok(r) => r,
        Err(e) => return error_response(KudiError::parse_error(format!("Invalid JSON: {}", e))),
    };

    match wallet::generate_all_wallets(Some(&request.mnemonic)) {
        Ok(wallets) => success_response(wallets),
        Err(e) => error_response(e),
    }
}

/// Validate a mnemonic phrase
///
/// # Input
/// ```json
/// { "mnemonic": "word1 word2 ..." }
/// ```
///
/// # Output
/// ```json
/// { "success": true, "data": { "valid": true } }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn kudi_validate_mnemonic(input: *const c_char) -> *mut c_char {
    let json_str = match parse_input(input) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    #[derive(serde::Deserialize)]
    struct ValidateRequest {
        mnemonic: String,
    }

    #[derive(serde::Serialize)]
    struct ValidateResponse {
        valid: bool,
    }

    let request: ValidateRequest = match serde_json::from_str(&json_str) {
        Ok(r) => r,
        Err(e) => return error_response(KudiError::parse_error(format!("Invalid JSON: {}", e))),
    };

    let valid = wallet::is_valid_mnemonic(&request.mnemonic);
    success_response(ValidateResponse { valid })
}

/// Flatten a wallet set into persistence rows for one user
///
/// # Input
/// ```json
/// { "user_id": "u-123", "wallets": { "BTC": {...}, ... } }
/// ```
///
/// # Output
/// One row per wallet, each tagged with the user id and address index
#[unsafe(no_mangle)]
pub extern "C" fn kudi_format_wallets_for_db(input: *const c_char) -> *mut c_char {
    let json_str = match parse_input(input) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    #[derive(serde::Deserialize)]
    struct FormatRequest {
        user_id: String,
        wallets: crate::types::WalletSet,
    }

    let request: FormatRequest = match serde_json::from_str(&json_str) {
        Ok(r) => r,
        Err(e) => return error_response(KudiError::parse_error(format!("Invalid JSON: {}", e))),
    };

    let rows = wallet::format_wallets_for_db(&request.user_id, &request.wallets);
    success_response(rows)
}
