//! Error types for the crypto layer

use thiserror::Error;

/// Errors that can occur in cryptographic operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// No usable crypto backend was found during probing
    #[error("no supported crypto backend available")]
    UnsupportedBackend,

    /// A box or secretbox failed to authenticate. Treated as a potential
    /// tampering signal; never retried automatically.
    #[error("authentication failed: ciphertext did not verify")]
    AuthenticationFailed,

    /// Caller-supplied key or nonce material was rejected before any
    /// cryptographic operation was attempted
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The system entropy source failed; fatal, not recoverable
    #[error("entropy source failure: {0}")]
    Entropy(String),
}
