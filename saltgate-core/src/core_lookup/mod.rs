//! Privacy-preserving identifier hashing for directory lookups
//!
//! Email addresses and phone numbers are never sent raw to the directory.
//! Each is normalized, then keyed-hashed with HMAC-SHA-256 under a fixed,
//! published per-purpose key. The keys being public means this protects
//! against casual enumeration only, not against a determined brute force
//! over the (small) phone number space.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Published HMAC key for email address hashing.
const EMAIL_HMAC_KEY: [u8; 32] = [
    0x30, 0xa5, 0x50, 0x0f, 0xed, 0x97, 0x01, 0xfa, 0x6d, 0xef, 0xdb, 0x61, 0x08, 0x41, 0x90,
    0x0f, 0xeb, 0xb8, 0xe4, 0x30, 0x88, 0x1f, 0x7a, 0xd8, 0x16, 0x82, 0x62, 0x64, 0xec, 0x09,
    0xba, 0xd7,
];

/// Published HMAC key for phone number hashing.
const PHONE_HMAC_KEY: [u8; 32] = [
    0x85, 0xad, 0xf8, 0x22, 0x69, 0x53, 0xf3, 0xd9, 0x6c, 0xfd, 0x5d, 0x09, 0xbf, 0x29, 0x55,
    0x5e, 0xb9, 0x55, 0xfc, 0xd8, 0xaa, 0x5e, 0xc4, 0xf9, 0xfc, 0xd8, 0x69, 0xe2, 0x58, 0x37,
    0x07, 0x23,
];

fn hash_identifier(normalized: &str, key: &[u8]) -> String {
    // HMAC accepts keys of any length, so this cannot fail
    let mut mac = HmacSha256::new_from_slice(key).expect("hmac key");
    mac.update(normalized.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Hash an email address for lookup: lower-cased, surrounding whitespace
/// trimmed.
pub fn hash_email(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    hash_identifier(&normalized, &EMAIL_HMAC_KEY)
}

/// Hash a phone number for lookup: every non-digit character stripped, so
/// `+41 79 123 45 67` and `0041791234567` differ only by the digits kept.
pub fn hash_phone(phone: &str) -> String {
    let normalized: String = phone.chars().filter(char::is_ascii_digit).collect();
    hash_identifier(&normalized, &PHONE_HMAC_KEY)
}
