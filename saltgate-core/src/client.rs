//! High-level gateway client
//!
//! Ties the codec to the two external collaborators: a [`KeyDirectory`]
//! that resolves recipient identities to public keys and a [`BlobTransport`]
//! that stores encrypted media bodies. The client never performs network
//! I/O itself; both collaborators are trait objects supplied by the caller.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::core_blob::{
    self, BlobTransport, EncryptedBlob, KeyDirectory, TransportError,
};
use crate::core_crypto::{CryptoError, PrivateKey, NONCE_LEN};
use crate::core_envelope::{EnvelopeCodec, EnvelopeError};
use crate::core_wire::{
    receipt, DeliveryReceiptMessage, FileMessage, GroupCreateMessage, GroupId, GroupImageMessage,
    GroupSetPhotoMessage, Identity, ImageMessage, LocationMessage, Message, MessageId,
    RenderingType, TextMessage,
};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<crate::core_wire::WireError> for ClientError {
    fn from(err: crate::core_wire::WireError) -> Self {
        ClientError::Envelope(err.into())
    }
}

/// Wire size fields are u32; anything larger cannot be represented and is
/// rejected instead of truncated.
fn blob_size(len: usize) -> Result<u32, ClientError> {
    u32::try_from(len)
        .map_err(|_| ClientError::InvalidArgument(format!("blob of {} bytes exceeds u32 size", len)))
}

/// A sealed envelope ready for submission, together with the recipient it
/// was sealed for.
#[derive(Debug, Clone)]
pub struct SealedMessage {
    pub recipient: String,
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

/// Whether a file message is addressed to a group or a single recipient.
/// One assembly path serves both; only the resulting variant differs.
#[derive(Debug, Clone, Copy, Default)]
pub enum GroupContext {
    #[default]
    None,
    Group(GroupId),
}

pub struct GatewayClient {
    codec: EnvelopeCodec,
    directory: Arc<dyn KeyDirectory>,
    blobs: Arc<dyn BlobTransport>,
    private_key: PrivateKey,
    max_text_bytes: usize,
}

impl GatewayClient {
    pub fn new(
        directory: Arc<dyn KeyDirectory>,
        blobs: Arc<dyn BlobTransport>,
        private_key: PrivateKey,
    ) -> Result<Self, ClientError> {
        Ok(GatewayClient {
            codec: EnvelopeCodec::new()?,
            directory,
            blobs,
            private_key,
            max_text_bytes: 3500,
        })
    }

    pub fn with_text_limit(mut self, max_text_bytes: usize) -> Self {
        self.max_text_bytes = max_text_bytes;
        self
    }

    /// Seal an arbitrary message for a recipient with a fresh nonce.
    pub async fn seal(
        &self,
        recipient: &str,
        message: &Message,
    ) -> Result<SealedMessage, ClientError> {
        let recipient_key = self.directory.public_key(recipient).await?;
        let envelope = self
            .codec
            .seal_envelope(message, &self.private_key, &recipient_key)?;
        info!(
            recipient,
            message_type = message.type_name(),
            ciphertext_len = envelope.ciphertext.len(),
            "sealed message"
        );
        Ok(SealedMessage {
            recipient: recipient.to_string(),
            nonce: envelope.nonce,
            ciphertext: envelope.ciphertext,
        })
    }

    /// Open an incoming envelope from a known sender.
    pub async fn open_incoming(
        &self,
        sender: &str,
        nonce: &[u8],
        ciphertext: &[u8],
    ) -> Result<Message, ClientError> {
        let sender_key = self.directory.public_key(sender).await?;
        let message = self
            .codec
            .open(ciphertext, &self.private_key, &sender_key, nonce)?;
        info!(sender, message_type = message.type_name(), "opened message");
        Ok(message)
    }

    pub async fn seal_text(&self, recipient: &str, text: &str) -> Result<SealedMessage, ClientError> {
        if text.len() > self.max_text_bytes {
            return Err(ClientError::InvalidArgument(format!(
                "text message exceeds {} bytes",
                self.max_text_bytes
            )));
        }
        self.seal(recipient, &Message::Text(TextMessage::new(text)))
            .await
    }

    pub async fn seal_location(
        &self,
        recipient: &str,
        location: LocationMessage,
    ) -> Result<SealedMessage, ClientError> {
        self.seal(recipient, &Message::Location(location)).await
    }

    pub async fn seal_delivery_receipt(
        &self,
        recipient: &str,
        receipt_type: u8,
        message_ids: Vec<MessageId>,
    ) -> Result<SealedMessage, ClientError> {
        if !(receipt::RECEIVED..=receipt::USER_DECLINE).contains(&receipt_type) {
            return Err(ClientError::InvalidArgument(format!(
                "unknown receipt type: {}",
                receipt_type
            )));
        }
        self.seal(
            recipient,
            &Message::DeliveryReceipt(DeliveryReceiptMessage {
                receipt_type,
                message_ids,
            }),
        )
        .await
    }

    /// Box-encrypt an image for one recipient, upload it, and seal the
    /// image message pointing at the blob.
    pub async fn send_image(
        &self,
        recipient: &str,
        image: &[u8],
    ) -> Result<SealedMessage, ClientError> {
        let recipient_key = self.directory.public_key(recipient).await?;
        let encrypted = core_blob::encrypt_image(
            self.codec.backend(),
            image,
            &self.private_key,
            &recipient_key,
        )?;
        let blob_id = self.blobs.upload(&encrypted.data).await?;
        debug!(blob_id = %blob_id.to_hex(), size = encrypted.data.len(), "uploaded image blob");
        self.seal(
            recipient,
            &Message::Image(ImageMessage {
                blob_id,
                size: blob_size(encrypted.data.len())?,
                nonce: encrypted.nonce,
            }),
        )
        .await
    }

    /// Encrypt and upload a file (plus optional thumbnail), then seal the
    /// file message. `context` decides between the one-to-one and group
    /// variants; everything else is shared.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_file(
        &self,
        recipient: &str,
        context: GroupContext,
        data: &[u8],
        file_name: &str,
        mime_type: &str,
        rendering: RenderingType,
        caption: Option<String>,
        thumbnail: Option<&[u8]>,
    ) -> Result<SealedMessage, ClientError> {
        let encrypted = core_blob::encrypt_file(self.codec.backend(), data)?;
        let blob_id = self.blobs.upload(&encrypted.data).await?;
        debug!(blob_id = %blob_id.to_hex(), size = encrypted.data.len(), "uploaded file blob");

        let mut file = FileMessage::new(
            blob_id,
            encrypted.key.clone(),
            mime_type,
            file_name,
            blob_size(encrypted.data.len())?,
            rendering,
        );
        file.caption = caption;

        if let Some(thumbnail) = thumbnail {
            let thumb_data =
                core_blob::encrypt_thumbnail(self.codec.backend(), thumbnail, &encrypted.key)?;
            let thumb_id = self.blobs.upload(&thumb_data).await?;
            debug!(blob_id = %thumb_id.to_hex(), size = thumb_data.len(), "uploaded thumbnail blob");
            file.thumbnail_blob_id = Some(thumb_id);
        }

        let message = match context {
            GroupContext::None => Message::File(file),
            GroupContext::Group(group) => Message::GroupFile { group, file },
        };
        self.seal(recipient, &message).await
    }

    /// Download a file message's blob and decrypt it with the key carried
    /// in the message.
    pub async fn download_file(&self, file: &FileMessage) -> Result<Vec<u8>, ClientError> {
        let data = self.blobs.download(&file.blob_id).await?;
        Ok(core_blob::decrypt_file(
            self.codec.backend(),
            &data,
            &file.key,
        )?)
    }

    pub async fn download_thumbnail(&self, file: &FileMessage) -> Result<Vec<u8>, ClientError> {
        let blob_id = file.thumbnail_blob_id.as_ref().ok_or_else(|| {
            ClientError::InvalidArgument("file message has no thumbnail".to_string())
        })?;
        let data = self.blobs.download(blob_id).await?;
        Ok(core_blob::decrypt_thumbnail(
            self.codec.backend(),
            &data,
            &file.key,
        )?)
    }

    pub async fn seal_group_text(
        &self,
        recipient: &str,
        group: GroupId,
        text: &str,
    ) -> Result<SealedMessage, ClientError> {
        if text.len() > self.max_text_bytes {
            return Err(ClientError::InvalidArgument(format!(
                "text message exceeds {} bytes",
                self.max_text_bytes
            )));
        }
        self.seal(
            recipient,
            &Message::GroupText {
                group,
                text: text.to_string(),
            },
        )
        .await
    }

    pub async fn seal_group_create(
        &self,
        recipient: &str,
        group: GroupId,
        members: Vec<Identity>,
    ) -> Result<SealedMessage, ClientError> {
        self.seal(
            recipient,
            &Message::GroupCreate(GroupCreateMessage { group, members }),
        )
        .await
    }

    pub async fn seal_group_rename(
        &self,
        recipient: &str,
        group: GroupId,
        name: &str,
    ) -> Result<SealedMessage, ClientError> {
        self.seal(
            recipient,
            &Message::GroupRename {
                group,
                name: name.to_string(),
            },
        )
        .await
    }

    pub async fn seal_group_leave(
        &self,
        recipient: &str,
        group: GroupId,
    ) -> Result<SealedMessage, ClientError> {
        self.seal(recipient, &Message::GroupLeave { group }).await
    }

    pub async fn seal_group_request_sync(
        &self,
        recipient: &str,
        group: GroupId,
    ) -> Result<SealedMessage, ClientError> {
        self.seal(recipient, &Message::GroupRequestSync { group })
            .await
    }

    /// Secretbox-encrypt a group image, upload it, and seal the group
    /// image message carrying the key.
    pub async fn send_group_image(
        &self,
        recipient: &str,
        group: GroupId,
        image: &[u8],
    ) -> Result<SealedMessage, ClientError> {
        let encrypted = core_blob::encrypt_file(self.codec.backend(), image)?;
        let blob_id = self.blobs.upload(&encrypted.data).await?;
        self.seal(
            recipient,
            &Message::GroupImage(GroupImageMessage {
                group,
                blob_id,
                size: blob_size(encrypted.data.len())?,
                key: encrypted.key,
            }),
        )
        .await
    }

    /// Upload a new group photo and seal the set-photo control message.
    pub async fn send_group_photo(
        &self,
        recipient: &str,
        group: GroupId,
        photo: &[u8],
    ) -> Result<SealedMessage, ClientError> {
        let EncryptedBlob { data, key, .. } = core_blob::encrypt_file(self.codec.backend(), photo)?;
        let blob_id = self.blobs.upload(&data).await?;
        debug!(blob_id = %blob_id.to_hex(), size = data.len(), "uploaded group photo blob");
        self.seal(
            recipient,
            &Message::GroupSetPhoto(GroupSetPhotoMessage {
                group,
                blob_id,
                size: blob_size(data.len())?,
                key,
            }),
        )
        .await
    }

    pub async fn seal_group_delete_photo(
        &self,
        recipient: &str,
        group: GroupId,
    ) -> Result<SealedMessage, ClientError> {
        self.seal(recipient, &Message::GroupDeletePhoto { group })
            .await
    }
}
