//! Collaborator seams for blob storage and key lookup
//!
//! The codec itself never talks to the network. Callers provide these two
//! traits; tests substitute in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::core_crypto::PublicKey;

use super::BlobId;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("blob not found: {0}")]
    NotFound(String),

    #[error("transport failure: {0}")]
    Io(String),

    #[error("rejected by remote: {0}")]
    Rejected(String),
}

/// Uploads and downloads opaque (already encrypted) blob bodies.
#[async_trait]
pub trait BlobTransport: Send + Sync {
    /// Store an encrypted blob body and return its server-assigned id.
    async fn upload(&self, data: &[u8]) -> Result<BlobId, TransportError>;

    /// Fetch an encrypted blob body by id.
    async fn download(&self, blob_id: &BlobId) -> Result<Vec<u8>, TransportError>;
}

/// Resolves recipient identities to their long-term public keys.
#[async_trait]
pub trait KeyDirectory: Send + Sync {
    async fn public_key(&self, identity: &str) -> Result<PublicKey, TransportError>;
}
