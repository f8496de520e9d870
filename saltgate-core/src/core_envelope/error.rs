//! Error taxonomy for sealing and opening envelopes

use thiserror::Error;

use crate::core_crypto::CryptoError;
use crate::core_wire::WireError;

/// Errors surfaced by the envelope codec. Nothing here is retried
/// internally; retry policy belongs to the transport layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The box did not authenticate and could not be opened
    #[error("decryption failed: box did not authenticate")]
    DecryptionFailed,

    /// Padding or the message body is structurally invalid
    #[error("malformed message: {0}")]
    Malformed(String),

    /// The leading type byte is not a recognized message type. Surfaced
    /// distinctly from [`EnvelopeError::Malformed`] so callers can choose
    /// to skip instead of abort.
    #[error("unsupported message type 0x{code:02x}")]
    UnsupportedType { code: u8 },

    /// Caller-supplied argument rejected before any cryptographic operation
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No crypto backend is available in this process
    #[error("no supported crypto backend available")]
    UnsupportedBackend,

    /// The system entropy source failed while drawing pad or nonce bytes
    #[error("entropy source failure: {0}")]
    Entropy(String),
}

impl From<CryptoError> for EnvelopeError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::AuthenticationFailed => EnvelopeError::DecryptionFailed,
            CryptoError::InvalidArgument(msg) => EnvelopeError::InvalidArgument(msg),
            CryptoError::UnsupportedBackend => EnvelopeError::UnsupportedBackend,
            CryptoError::Entropy(msg) => EnvelopeError::Entropy(msg),
        }
    }
}

impl From<WireError> for EnvelopeError {
    fn from(e: WireError) -> Self {
        match e {
            WireError::Malformed(msg) => EnvelopeError::Malformed(msg),
            WireError::UnsupportedType { code } => EnvelopeError::UnsupportedType { code },
            WireError::InvalidArgument(msg) => EnvelopeError::InvalidArgument(msg),
        }
    }
}
