//! The swappable crypto backend contract and process-wide selection
//!
//! Backends are probed in a fixed preference order; the first one reporting
//! itself supported is pinned into a `OnceLock` and shared for the rest of
//! the process. A manual [`install`] is allowed for tests, but only before
//! the first selection; afterwards it is a no-op.

use std::sync::{Arc, OnceLock};

use tracing::info;

use super::error::CryptoError;
use super::keys::{KeyPair, PrivateKey, PublicKey};
use super::nacl::NaclBackend;
use super::NONCE_LEN;

/// Authenticated public-key box and symmetric secret-box primitives plus a
/// cryptographically secure random source.
///
/// All operations are synchronous and pure with respect to their explicit
/// inputs; implementations must be safe to share across threads.
pub trait CryptoBackend: Send + Sync {
    /// Short backend identifier for logs
    fn name(&self) -> &'static str;

    /// Whether this backend can run in the current process
    fn is_supported(&self) -> bool;

    /// Generate a fresh box key pair
    fn generate_keypair(&self) -> Result<KeyPair, CryptoError>;

    /// Derive the public key belonging to a private key. Deterministic.
    fn derive_public_key(&self, private: &PrivateKey) -> PublicKey;

    /// Authenticated public-key encryption. The ciphertext is plaintext
    /// length plus the 16-byte authenticator.
    fn seal_box(
        &self,
        plaintext: &[u8],
        nonce: &[u8],
        sender_private: &PrivateKey,
        recipient_public: &PublicKey,
    ) -> Result<Vec<u8>, CryptoError>;

    /// Open a box. Returns [`CryptoError::AuthenticationFailed`] if the
    /// authenticator does not verify.
    fn open_box(
        &self,
        ciphertext: &[u8],
        nonce: &[u8],
        recipient_private: &PrivateKey,
        sender_public: &PublicKey,
    ) -> Result<Vec<u8>, CryptoError>;

    /// Authenticated symmetric encryption (file bodies and thumbnails)
    fn seal_secret(
        &self,
        plaintext: &[u8],
        nonce: &[u8],
        key: &[u8; 32],
    ) -> Result<Vec<u8>, CryptoError>;

    /// Open a secretbox. Same failure contract as [`Self::open_box`].
    fn open_secret(
        &self,
        ciphertext: &[u8],
        nonce: &[u8],
        key: &[u8; 32],
    ) -> Result<Vec<u8>, CryptoError>;

    /// Fill a buffer from the CSPRNG
    fn random_bytes(&self, n: usize) -> Result<Vec<u8>, CryptoError>;
}

/// Validate a caller-supplied nonce before any cryptographic operation.
pub(crate) fn check_nonce(nonce: &[u8]) -> Result<[u8; NONCE_LEN], CryptoError> {
    <[u8; NONCE_LEN]>::try_from(nonce).map_err(|_| {
        CryptoError::InvalidArgument(format!(
            "nonce must be {} bytes, got {}",
            NONCE_LEN,
            nonce.len()
        ))
    })
}

static SELECTED: OnceLock<Arc<dyn CryptoBackend>> = OnceLock::new();

/// Candidate backends in preference order.
fn candidates() -> Vec<Arc<dyn CryptoBackend>> {
    vec![Arc::new(NaclBackend::new())]
}

/// Return the process-wide backend, probing the candidate list on first use.
///
/// Fails with [`CryptoError::UnsupportedBackend`] if no candidate reports
/// itself supported.
pub fn select() -> Result<Arc<dyn CryptoBackend>, CryptoError> {
    if let Some(backend) = SELECTED.get() {
        return Ok(backend.clone());
    }
    let probed = candidates()
        .into_iter()
        .find(|b| b.is_supported())
        .ok_or(CryptoError::UnsupportedBackend)?;
    let backend = SELECTED.get_or_init(|| {
        info!(backend = probed.name(), "selected crypto backend");
        probed
    });
    Ok(backend.clone())
}

/// Install a backend ahead of the probe, for test seams.
///
/// First write wins: if a backend has already been selected this is a no-op
/// and the active backend is returned instead, which makes re-installation
/// idempotent.
pub fn install(backend: Arc<dyn CryptoBackend>) -> Arc<dyn CryptoBackend> {
    SELECTED.get_or_init(|| backend).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_returns_nacl() {
        let backend = select().unwrap();
        assert_eq!(backend.name(), "nacl");
    }

    #[test]
    fn test_select_is_stable() {
        let a = select().unwrap();
        let b = select().unwrap();
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn test_install_after_selection_is_noop() {
        let active = select().unwrap();
        let installed = install(Arc::new(NaclBackend::new()));
        assert_eq!(active.name(), installed.name());
    }

    #[test]
    fn test_nonce_length_checked() {
        assert!(check_nonce(&[0u8; 24]).is_ok());
        assert!(matches!(
            check_nonce(&[0u8; 23]),
            Err(CryptoError::InvalidArgument(_))
        ));
    }
}
