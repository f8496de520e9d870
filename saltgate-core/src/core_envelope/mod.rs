//! E2E message envelope: padding plus the seal/open orchestration
//!
//! A typed [`crate::core_wire::Message`] becomes wire ciphertext in three
//! steps: canonical plaintext encoding (core_wire), random-length padding,
//! and a NaCl box (core_crypto). Opening reverses the steps with strict
//! validation at every stage.

mod codec;
mod error;
mod padding;

pub use codec::{EncryptedEnvelope, EnvelopeCodec};
pub use error::EnvelopeError;
pub use padding::{pad, unpad};
