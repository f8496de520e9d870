//! Typed message variants and their one-byte wire codes
//!
//! Every plaintext starts with a type code; the rest of the layout is fixed
//! per variant. Integers are little-endian. Group variants carry the 16-byte
//! creator + group-id prefix except for the control messages that travel
//! only between a member and the creator (create, set-photo, sync request),
//! which carry the bare 8-byte group id.

use std::fmt;

use crate::core_blob::{BlobId, SymmetricKey};
use crate::core_crypto::NONCE_LEN;

use super::error::WireError;
use super::file_json::FileMessage;
use super::group::{GroupId, Identity};
use super::location::LocationMessage;

/// Wire type codes. The 0x40 block is group messages, 0x80 is receipts.
pub mod codes {
    pub const TEXT: u8 = 0x01;
    pub const IMAGE: u8 = 0x02;
    pub const LOCATION: u8 = 0x10;
    pub const VIDEO: u8 = 0x13;
    pub const AUDIO: u8 = 0x14;
    pub const FILE: u8 = 0x17;
    pub const GROUP_TEXT: u8 = 0x41;
    pub const GROUP_LOCATION: u8 = 0x42;
    pub const GROUP_IMAGE: u8 = 0x43;
    pub const GROUP_VIDEO: u8 = 0x44;
    pub const GROUP_AUDIO: u8 = 0x45;
    pub const GROUP_FILE: u8 = 0x46;
    pub const GROUP_CREATE: u8 = 0x4a;
    pub const GROUP_RENAME: u8 = 0x4b;
    pub const GROUP_LEAVE: u8 = 0x4c;
    pub const GROUP_SET_PHOTO: u8 = 0x50;
    pub const GROUP_REQUEST_SYNC: u8 = 0x51;
    pub const GROUP_DELETE_PHOTO: u8 = 0x54;
    pub const DELIVERY_RECEIPT: u8 = 0x80;
}

/// Length of a message id in bytes.
pub const MESSAGE_ID_LEN: usize = 8;

/// An 8-byte server-assigned message id, referenced by delivery receipts.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId([u8; MESSAGE_ID_LEN]);

impl MessageId {
    pub fn from_bytes(bytes: [u8; MESSAGE_ID_LEN]) -> Self {
        MessageId(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, WireError> {
        let bytes = hex::decode(s)
            .map_err(|e| WireError::InvalidArgument(format!("invalid message id hex: {}", e)))?;
        bytes
            .try_into()
            .map(MessageId)
            .map_err(|_| WireError::InvalidArgument("message id must be 8 bytes".to_string()))
    }

    pub fn as_bytes(&self) -> &[u8; MESSAGE_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextMessage {
    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        TextMessage { text: text.into() }
    }
}

/// One-to-one image: box-encrypted body, nonce embedded in the message.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMessage {
    pub blob_id: BlobId,
    pub size: u32,
    pub nonce: [u8; NONCE_LEN],
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoMessage {
    pub duration_secs: i16,
    pub blob_id: BlobId,
    pub size: u32,
    pub thumbnail_blob_id: BlobId,
    pub thumbnail_size: u32,
    pub key: SymmetricKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioMessage {
    pub duration_secs: i16,
    pub blob_id: BlobId,
    pub size: u32,
    pub key: SymmetricKey,
}

/// Acknowledgement codes carried in a delivery receipt.
pub mod receipt {
    pub const RECEIVED: u8 = 0x01;
    pub const READ: u8 = 0x02;
    pub const USER_ACK: u8 = 0x03;
    pub const USER_DECLINE: u8 = 0x04;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReceiptMessage {
    pub receipt_type: u8,
    pub message_ids: Vec<MessageId>,
}

/// Group image: secretbox scheme, key in the message, fixed nonce for the
/// blob body.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupImageMessage {
    pub group: GroupId,
    pub blob_id: BlobId,
    pub size: u32,
    pub key: SymmetricKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSetPhotoMessage {
    pub group: GroupId,
    pub blob_id: BlobId,
    pub size: u32,
    pub key: SymmetricKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupCreateMessage {
    pub group: GroupId,
    pub members: Vec<Identity>,
}

/// The full typed message set the codec can seal and open.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(TextMessage),
    Image(ImageMessage),
    Location(LocationMessage),
    Video(VideoMessage),
    Audio(AudioMessage),
    File(FileMessage),
    DeliveryReceipt(DeliveryReceiptMessage),
    GroupText { group: GroupId, text: String },
    GroupLocation { group: GroupId, location: LocationMessage },
    GroupImage(GroupImageMessage),
    GroupVideo { group: GroupId, video: VideoMessage },
    GroupAudio { group: GroupId, audio: AudioMessage },
    GroupFile { group: GroupId, file: FileMessage },
    GroupCreate(GroupCreateMessage),
    GroupRename { group: GroupId, name: String },
    GroupLeave { group: GroupId },
    GroupSetPhoto(GroupSetPhotoMessage),
    GroupRequestSync { group: GroupId },
    GroupDeletePhoto { group: GroupId },
}

impl Message {
    pub fn type_code(&self) -> u8 {
        match self {
            Message::Text(_) => codes::TEXT,
            Message::Image(_) => codes::IMAGE,
            Message::Location(_) => codes::LOCATION,
            Message::Video(_) => codes::VIDEO,
            Message::Audio(_) => codes::AUDIO,
            Message::File(_) => codes::FILE,
            Message::DeliveryReceipt(_) => codes::DELIVERY_RECEIPT,
            Message::GroupText { .. } => codes::GROUP_TEXT,
            Message::GroupLocation { .. } => codes::GROUP_LOCATION,
            Message::GroupImage(_) => codes::GROUP_IMAGE,
            Message::GroupVideo { .. } => codes::GROUP_VIDEO,
            Message::GroupAudio { .. } => codes::GROUP_AUDIO,
            Message::GroupFile { .. } => codes::GROUP_FILE,
            Message::GroupCreate(_) => codes::GROUP_CREATE,
            Message::GroupRename { .. } => codes::GROUP_RENAME,
            Message::GroupLeave { .. } => codes::GROUP_LEAVE,
            Message::GroupSetPhoto(_) => codes::GROUP_SET_PHOTO,
            Message::GroupRequestSync { .. } => codes::GROUP_REQUEST_SYNC,
            Message::GroupDeletePhoto { .. } => codes::GROUP_DELETE_PHOTO,
        }
    }

    /// Human-readable variant name for logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Message::Text(_) => "text",
            Message::Image(_) => "image",
            Message::Location(_) => "location",
            Message::Video(_) => "video",
            Message::Audio(_) => "audio",
            Message::File(_) => "file",
            Message::DeliveryReceipt(_) => "delivery_receipt",
            Message::GroupText { .. } => "group_text",
            Message::GroupLocation { .. } => "group_location",
            Message::GroupImage(_) => "group_image",
            Message::GroupVideo { .. } => "group_video",
            Message::GroupAudio { .. } => "group_audio",
            Message::GroupFile { .. } => "group_file",
            Message::GroupCreate(_) => "group_create",
            Message::GroupRename { .. } => "group_rename",
            Message::GroupLeave { .. } => "group_leave",
            Message::GroupSetPhoto(_) => "group_set_photo",
            Message::GroupRequestSync { .. } => "group_request_sync",
            Message::GroupDeletePhoto { .. } => "group_delete_photo",
        }
    }
}
