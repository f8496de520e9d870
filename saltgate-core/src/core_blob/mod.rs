//! Blob identifiers, per-upload symmetric keys, and file/thumbnail crypto
//!
//! File, video, audio, and image payloads travel outside the envelope as
//! opaque encrypted blobs. Bodies are secretbox-encrypted under a fresh
//! 32-byte key per upload with well-known fixed nonces; the key rides inside
//! the (box-protected) message, so the fixed nonces are safe because no key
//! is ever reused across uploads. One-to-one image messages instead use a
//! one-way box with a random nonce embedded in the message body.

mod transport;

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::core_crypto::{CryptoBackend, CryptoError, PrivateKey, PublicKey, NONCE_LEN};

pub use transport::{BlobTransport, KeyDirectory, TransportError};

/// Blob identifier length in bytes.
pub const BLOB_ID_LEN: usize = 16;

/// Symmetric blob key length in bytes.
pub const SYMMETRIC_KEY_LEN: usize = 32;

/// Fixed nonce for file bodies. Safe only because every symmetric key is
/// single-use per upload.
pub const FILE_NONCE: [u8; NONCE_LEN] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
];

/// Fixed nonce for thumbnails, distinct from [`FILE_NONCE`] so a thumbnail
/// can share the file's key.
pub const THUMBNAIL_NONCE: [u8; NONCE_LEN] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2,
];

/// 16-byte blob identifier. Raw bytes in fixed-binary layouts, lowercase
/// hex text in JSON contexts.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobId([u8; BLOB_ID_LEN]);

impl BlobId {
    pub fn from_bytes(bytes: [u8; BLOB_ID_LEN]) -> Self {
        BlobId(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s)
            .map_err(|e| CryptoError::InvalidArgument(format!("invalid blob id hex: {}", e)))?;
        bytes
            .try_into()
            .map(BlobId)
            .map_err(|_| CryptoError::InvalidArgument("blob id must be 16 bytes".to_string()))
    }

    pub fn as_bytes(&self) -> &[u8; BLOB_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobId({})", self.to_hex())
    }
}

impl Serialize for BlobId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BlobId::from_hex(&s).map_err(D::Error::custom)
    }
}

/// 32-byte symmetric key, generated per upload and never reused. Zeroized
/// on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey([u8; SYMMETRIC_KEY_LEN]);

impl SymmetricKey {
    pub fn from_bytes(bytes: [u8; SYMMETRIC_KEY_LEN]) -> Self {
        SymmetricKey(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s)
            .map_err(|e| CryptoError::InvalidArgument(format!("invalid key hex: {}", e)))?;
        bytes
            .try_into()
            .map(SymmetricKey)
            .map_err(|_| CryptoError::InvalidArgument("symmetric key must be 32 bytes".to_string()))
    }

    pub fn as_bytes(&self) -> &[u8; SYMMETRIC_KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymmetricKey(<redacted>)")
    }
}

impl Serialize for SymmetricKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SymmetricKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SymmetricKey::from_hex(&s).map_err(D::Error::custom)
    }
}

/// What the upload collaborator hands back after storing encrypted blobs,
/// and what the wire format consumes when building media payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobReference {
    pub blob_id: BlobId,
    pub size: u32,
    pub thumbnail_blob_id: Option<BlobId>,
    pub thumbnail_size: Option<u32>,
    pub key: Option<SymmetricKey>,
}

impl BlobReference {
    pub fn new(blob_id: BlobId, size: u32) -> Self {
        BlobReference {
            blob_id,
            size,
            thumbnail_blob_id: None,
            thumbnail_size: None,
            key: None,
        }
    }
}

/// A secretbox-encrypted blob body together with its single-use key.
#[derive(Clone)]
pub struct EncryptedBlob {
    pub data: Vec<u8>,
    pub key: SymmetricKey,
    pub nonce: [u8; NONCE_LEN],
}

impl EncryptedBlob {
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }
}

/// A box-encrypted image body; the nonce travels inside the image message.
#[derive(Clone)]
pub struct EncryptedImage {
    pub data: Vec<u8>,
    pub nonce: [u8; NONCE_LEN],
}

/// Encrypt a file body under a fresh symmetric key and the fixed file nonce.
pub fn encrypt_file(
    backend: &dyn CryptoBackend,
    data: &[u8],
) -> Result<EncryptedBlob, CryptoError> {
    let key_bytes: [u8; SYMMETRIC_KEY_LEN] = backend
        .random_bytes(SYMMETRIC_KEY_LEN)?
        .try_into()
        .map_err(|_| CryptoError::Entropy("short read from CSPRNG".to_string()))?;
    let key = SymmetricKey::from_bytes(key_bytes);
    let data = backend.seal_secret(data, &FILE_NONCE, key.as_bytes())?;
    Ok(EncryptedBlob {
        data,
        key,
        nonce: FILE_NONCE,
    })
}

pub fn decrypt_file(
    backend: &dyn CryptoBackend,
    data: &[u8],
    key: &SymmetricKey,
) -> Result<Vec<u8>, CryptoError> {
    backend.open_secret(data, &FILE_NONCE, key.as_bytes())
}

/// Encrypt a thumbnail under the file's key and the fixed thumbnail nonce.
pub fn encrypt_thumbnail(
    backend: &dyn CryptoBackend,
    data: &[u8],
    key: &SymmetricKey,
) -> Result<Vec<u8>, CryptoError> {
    backend.seal_secret(data, &THUMBNAIL_NONCE, key.as_bytes())
}

pub fn decrypt_thumbnail(
    backend: &dyn CryptoBackend,
    data: &[u8],
    key: &SymmetricKey,
) -> Result<Vec<u8>, CryptoError> {
    backend.open_secret(data, &THUMBNAIL_NONCE, key.as_bytes())
}

/// Box-encrypt an image body with a random nonce (one-way image scheme).
pub fn encrypt_image(
    backend: &dyn CryptoBackend,
    data: &[u8],
    sender_private: &PrivateKey,
    recipient_public: &PublicKey,
) -> Result<EncryptedImage, CryptoError> {
    let nonce_bytes = backend.random_bytes(NONCE_LEN)?;
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&nonce_bytes);
    let data = backend.seal_box(data, &nonce, sender_private, recipient_public)?;
    Ok(EncryptedImage { data, nonce })
}

pub fn decrypt_image(
    backend: &dyn CryptoBackend,
    data: &[u8],
    nonce: &[u8],
    recipient_private: &PrivateKey,
    sender_public: &PublicKey,
) -> Result<Vec<u8>, CryptoError> {
    backend.open_box(data, nonce, recipient_private, sender_public)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_crypto::NaclBackend;

    #[test]
    fn test_blob_id_hex_roundtrip() {
        let id = BlobId::from_bytes([0xde; 16]);
        assert_eq!(BlobId::from_hex(&id.to_hex()).unwrap(), id);
        assert!(BlobId::from_hex("abcd").is_err());
        assert!(BlobId::from_hex("zz").is_err());
    }

    #[test]
    fn test_symmetric_key_debug_redacted() {
        let key = SymmetricKey::from_bytes([0x11; 32]);
        assert!(format!("{:?}", key).contains("<redacted>"));
    }

    #[test]
    fn test_file_encryption_roundtrip() {
        let backend = NaclBackend::new();
        let body = b"file contents".as_slice();

        let encrypted = encrypt_file(&backend, body).unwrap();
        assert_eq!(encrypted.nonce, FILE_NONCE);
        assert_eq!(encrypted.size() as usize, body.len() + 16);

        let decrypted = decrypt_file(&backend, &encrypted.data, &encrypted.key).unwrap();
        assert_eq!(decrypted, body);
    }

    #[test]
    fn test_fresh_key_per_upload() {
        let backend = NaclBackend::new();
        let a = encrypt_file(&backend, b"same body").unwrap();
        let b = encrypt_file(&backend, b"same body").unwrap();
        assert_ne!(a.key, b.key);
        assert_ne!(a.data, b.data);
    }

    #[test]
    fn test_thumbnail_shares_key_distinct_nonce() {
        let backend = NaclBackend::new();
        let file = encrypt_file(&backend, b"full image").unwrap();

        let thumb = encrypt_thumbnail(&backend, b"thumb", &file.key).unwrap();
        assert_eq!(
            decrypt_thumbnail(&backend, &thumb, &file.key).unwrap(),
            b"thumb"
        );
        // the file nonce must not open a thumbnail box
        assert!(decrypt_file(&backend, &thumb, &file.key).is_err());
    }

    #[test]
    fn test_image_encryption_roundtrip() {
        let backend = NaclBackend::new();
        let alice = backend.generate_keypair().unwrap();
        let bob = backend.generate_keypair().unwrap();

        let encrypted = encrypt_image(&backend, b"jpeg bytes", &alice.private, &bob.public).unwrap();
        let decrypted = decrypt_image(
            &backend,
            &encrypted.data,
            &encrypted.nonce,
            &bob.private,
            &alice.public,
        )
        .unwrap();
        assert_eq!(decrypted, b"jpeg bytes");
    }
}
