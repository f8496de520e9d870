//! Key material for the box construction
//!
//! Private keys are zeroized on drop and redacted in Debug output. The
//! textual encodings carry a `public:` / `private:` prefix so a key pasted
//! into the wrong field is caught immediately instead of silently misused.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::CryptoError;

/// Public and private key length in bytes (Curve25519).
pub const KEY_LEN: usize = 32;

const PUBLIC_KEY_PREFIX: &str = "public:";
const PRIVATE_KEY_PREFIX: &str = "private:";

/// A 32-byte Curve25519 public key
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; KEY_LEN]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        PublicKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Encode as `public:` + lowercase hex
    pub fn encode(&self) -> String {
        format!("{}{}", PUBLIC_KEY_PREFIX, hex::encode(self.0))
    }

    /// Parse the `public:`-prefixed hex encoding
    pub fn decode(s: &str) -> Result<Self, CryptoError> {
        let hex_part = s
            .strip_prefix(PUBLIC_KEY_PREFIX)
            .ok_or_else(|| CryptoError::InvalidArgument("missing 'public:' prefix".to_string()))?;
        parse_key_hex(hex_part).map(PublicKey)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

/// A 32-byte Curve25519 private key, zeroized on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; KEY_LEN]);

impl PrivateKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        PrivateKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Encode as `private:` + lowercase hex
    pub fn encode(&self) -> String {
        format!("{}{}", PRIVATE_KEY_PREFIX, hex::encode(self.0))
    }

    /// Parse the `private:`-prefixed hex encoding
    pub fn decode(s: &str) -> Result<Self, CryptoError> {
        let hex_part = s
            .strip_prefix(PRIVATE_KEY_PREFIX)
            .ok_or_else(|| CryptoError::InvalidArgument("missing 'private:' prefix".to_string()))?;
        parse_key_hex(hex_part).map(PrivateKey)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(<redacted>)")
    }
}

fn parse_key_hex(hex_part: &str) -> Result<[u8; KEY_LEN], CryptoError> {
    let bytes = hex::decode(hex_part)
        .map_err(|e| CryptoError::InvalidArgument(format!("invalid key hex: {}", e)))?;
    let arr: [u8; KEY_LEN] = bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidArgument("key must be 32 bytes".to_string()))?;
    Ok(arr)
}

/// A freshly generated box key pair. Immutable once generated; ownership
/// belongs to the caller holding the identity.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub private: PrivateKey,
    pub public: PublicKey,
}
