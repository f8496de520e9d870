//! Saltgate - E2E Encrypted Messaging Gateway Client Core
//!
//! The center of this crate is the envelope codec: typed messages are
//! encoded to a compact binary wire format, length-padded, and sealed in a
//! NaCl box; incoming envelopes take the same path in reverse.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │    GatewayClient (client)    │
//! └──┬───────────┬───────────┬───┘
//!    │           │           │
//!    ▼           ▼           ▼
//! Envelope     Blobs      Lookup
//!    │           │
//!    ▼           ▼
//!  Wire       Crypto backend
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use saltgate_core::core_crypto::{self, CryptoBackend};
//! use saltgate_core::core_envelope::EnvelopeCodec;
//! use saltgate_core::core_wire::{Message, TextMessage};
//!
//! let backend = core_crypto::select()?;
//! let alice = backend.generate_keypair()?;
//! let bob = backend.generate_keypair()?;
//!
//! let codec = EnvelopeCodec::new()?;
//! let envelope = codec.seal_envelope(
//!     &Message::Text(TextMessage::new("hi")),
//!     &alice.private,
//!     &bob.public,
//! )?;
//! let message = codec.open(&envelope.ciphertext, &bob.private, &alice.public, &envelope.nonce)?;
//! ```

pub mod client;
pub mod config;
pub mod core_blob;
pub mod core_crypto;
pub mod core_envelope;
pub mod core_lookup;
pub mod core_wire;
pub mod logging;

pub use client::{ClientError, GatewayClient, SealedMessage};
pub use config::GatewayConfig;
pub use core_envelope::{EncryptedEnvelope, EnvelopeCodec, EnvelopeError};
pub use core_wire::Message;
pub use logging::{init_logging, LogLevel};
