//! Binary wire format for typed messages
//!
//! A plaintext is a one-byte type code followed by a per-variant body.
//! Encoding and decoding are exact inverses for every structurally valid
//! message; decoding rejects anything else with an explicit error.

mod decode;
mod encode;
mod error;
mod file_json;
mod group;
mod location;
mod message;

pub use decode::decode;
pub use encode::encode;
pub use error::WireError;
pub use file_json::{FileMessage, RenderingType};
pub use group::{GroupId, Identity, GROUP_ID_LEN, GROUP_PREFIX_LEN, IDENTITY_LEN};
pub use location::LocationMessage;
pub use message::{
    codes, receipt, AudioMessage, DeliveryReceiptMessage, GroupCreateMessage, GroupImageMessage,
    GroupSetPhotoMessage, ImageMessage, Message, MessageId, TextMessage, VideoMessage,
    MESSAGE_ID_LEN,
};
