//! Reference backend over the pure-Rust NaCl constructions
//!
//! Box is X25519 + XSalsa20-Poly1305 (`crypto_box::SalsaBox`), secretbox is
//! XSalsa20-Poly1305 (`crypto_secretbox`). Always supported; sits first in
//! the probe order.

use crypto_box::aead::Aead;
use crypto_box::{PublicKey as BoxPublicKey, SalsaBox, SecretKey as BoxSecretKey};
use crypto_secretbox::aead::KeyInit;
use crypto_secretbox::XSalsa20Poly1305;
use rand_core::{OsRng, RngCore};

use super::backend::{check_nonce, CryptoBackend};
use super::error::CryptoError;
use super::keys::{KeyPair, PrivateKey, PublicKey};

pub struct NaclBackend;

impl NaclBackend {
    pub fn new() -> Self {
        NaclBackend
    }
}

impl Default for NaclBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoBackend for NaclBackend {
    fn name(&self) -> &'static str {
        "nacl"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn generate_keypair(&self) -> Result<KeyPair, CryptoError> {
        let mut seed = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| CryptoError::Entropy(e.to_string()))?;
        let secret = BoxSecretKey::from(seed);
        let public = secret.public_key();
        Ok(KeyPair {
            private: PrivateKey::from_bytes(secret.to_bytes()),
            public: PublicKey::from_bytes(*public.as_bytes()),
        })
    }

    fn derive_public_key(&self, private: &PrivateKey) -> PublicKey {
        let secret = BoxSecretKey::from(*private.as_bytes());
        PublicKey::from_bytes(*secret.public_key().as_bytes())
    }

    fn seal_box(
        &self,
        plaintext: &[u8],
        nonce: &[u8],
        sender_private: &PrivateKey,
        recipient_public: &PublicKey,
    ) -> Result<Vec<u8>, CryptoError> {
        let nonce = check_nonce(nonce)?;
        let secret = BoxSecretKey::from(*sender_private.as_bytes());
        let public = BoxPublicKey::from(*recipient_public.as_bytes());
        SalsaBox::new(&public, &secret)
            .encrypt(&nonce.into(), plaintext)
            .map_err(|_| CryptoError::InvalidArgument("box encryption failed".to_string()))
    }

    fn open_box(
        &self,
        ciphertext: &[u8],
        nonce: &[u8],
        recipient_private: &PrivateKey,
        sender_public: &PublicKey,
    ) -> Result<Vec<u8>, CryptoError> {
        let nonce = check_nonce(nonce)?;
        let secret = BoxSecretKey::from(*recipient_private.as_bytes());
        let public = BoxPublicKey::from(*sender_public.as_bytes());
        SalsaBox::new(&public, &secret)
            .decrypt(&nonce.into(), ciphertext)
            .map_err(|_| CryptoError::AuthenticationFailed)
    }

    fn seal_secret(
        &self,
        plaintext: &[u8],
        nonce: &[u8],
        key: &[u8; 32],
    ) -> Result<Vec<u8>, CryptoError> {
        let nonce = check_nonce(nonce)?;
        XSalsa20Poly1305::new(key.into())
            .encrypt(&nonce.into(), plaintext)
            .map_err(|_| CryptoError::InvalidArgument("secretbox encryption failed".to_string()))
    }

    fn open_secret(
        &self,
        ciphertext: &[u8],
        nonce: &[u8],
        key: &[u8; 32],
    ) -> Result<Vec<u8>, CryptoError> {
        let nonce = check_nonce(nonce)?;
        XSalsa20Poly1305::new(key.into())
            .decrypt(&nonce.into(), ciphertext)
            .map_err(|_| CryptoError::AuthenticationFailed)
    }

    fn random_bytes(&self, n: usize) -> Result<Vec<u8>, CryptoError> {
        let mut buf = vec![0u8; n];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| CryptoError::Entropy(e.to_string()))?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_crypto::{MAC_LEN, NONCE_LEN};

    fn backend() -> NaclBackend {
        NaclBackend::new()
    }

    #[test]
    fn test_keypair_generation() {
        let kp = backend().generate_keypair().unwrap();
        assert_eq!(kp.private.as_bytes().len(), 32);
        assert_eq!(kp.public.as_bytes().len(), 32);
    }

    #[test]
    fn test_derive_public_key_matches_generated() {
        let b = backend();
        let kp = b.generate_keypair().unwrap();
        assert_eq!(b.derive_public_key(&kp.private), kp.public);
    }

    #[test]
    fn test_box_roundtrip() {
        let b = backend();
        let alice = b.generate_keypair().unwrap();
        let bob = b.generate_keypair().unwrap();
        let nonce = b.random_bytes(NONCE_LEN).unwrap();

        let plaintext = b"attack at dawn";
        let boxed = b
            .seal_box(plaintext, &nonce, &alice.private, &bob.public)
            .unwrap();
        assert_eq!(boxed.len(), plaintext.len() + MAC_LEN);

        let opened = b
            .open_box(&boxed, &nonce, &bob.private, &alice.public)
            .unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_box_wrong_key_fails() {
        let b = backend();
        let alice = b.generate_keypair().unwrap();
        let bob = b.generate_keypair().unwrap();
        let eve = b.generate_keypair().unwrap();
        let nonce = [7u8; NONCE_LEN];

        let boxed = b
            .seal_box(b"secret", &nonce, &alice.private, &bob.public)
            .unwrap();
        assert_eq!(
            b.open_box(&boxed, &nonce, &eve.private, &alice.public),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn test_box_tampered_ciphertext_fails() {
        let b = backend();
        let alice = b.generate_keypair().unwrap();
        let bob = b.generate_keypair().unwrap();
        let nonce = [3u8; NONCE_LEN];

        let mut boxed = b
            .seal_box(b"payload", &nonce, &alice.private, &bob.public)
            .unwrap();
        boxed[0] ^= 0x01;
        assert_eq!(
            b.open_box(&boxed, &nonce, &bob.private, &alice.public),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn test_secretbox_roundtrip() {
        let b = backend();
        let key = [9u8; 32];
        let nonce = [1u8; NONCE_LEN];

        let sealed = b.seal_secret(b"blob body", &nonce, &key).unwrap();
        assert_eq!(sealed.len(), 9 + MAC_LEN);
        assert_eq!(b.open_secret(&sealed, &nonce, &key).unwrap(), b"blob body");
    }

    #[test]
    fn test_secretbox_wrong_key_fails() {
        let b = backend();
        let nonce = [1u8; NONCE_LEN];
        let sealed = b.seal_secret(b"blob body", &nonce, &[9u8; 32]).unwrap();
        assert_eq!(
            b.open_secret(&sealed, &nonce, &[8u8; 32]),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn test_short_nonce_rejected_before_crypto() {
        let b = backend();
        let kp = b.generate_keypair().unwrap();
        let result = b.seal_box(b"x", &[0u8; 12], &kp.private, &kp.public);
        assert!(matches!(result, Err(CryptoError::InvalidArgument(_))));
    }

    #[test]
    fn test_random_bytes_length_and_variation() {
        let b = backend();
        let a = b.random_bytes(32).unwrap();
        let c = b.random_bytes(32).unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a, c);
    }
}
