//! Cryptographic backend layer
//!
//! Everything above this module is backend-agnostic: the envelope codec and
//! the blob helpers only talk to the [`CryptoBackend`] trait. Concrete
//! backends are probed in a fixed preference order at first use and the
//! winner is pinned for the process lifetime (see [`backend::select`]).

mod backend;
mod error;
mod keys;
mod nacl;

pub use backend::{install, select, CryptoBackend};
pub use error::CryptoError;
pub use keys::{KeyPair, PrivateKey, PublicKey, KEY_LEN};
pub use nacl::NaclBackend;

/// Box and secretbox nonce length in bytes.
pub const NONCE_LEN: usize = 24;

/// Poly1305 authenticator overhead added to every box/secretbox.
pub const MAC_LEN: usize = 16;
