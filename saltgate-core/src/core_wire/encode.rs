//! Message encoding: typed variant to type byte + body

use super::error::WireError;
use super::message::{AudioMessage, Message, VideoMessage};

/// Encode a message as the full plaintext: type byte followed by the
/// variant's body.
pub fn encode(message: &Message) -> Result<Vec<u8>, WireError> {
    let mut out = vec![message.type_code()];
    match message {
        Message::Text(text) => {
            if text.text.is_empty() {
                return Err(WireError::InvalidArgument(
                    "text message must not be empty".to_string(),
                ));
            }
            out.extend_from_slice(text.text.as_bytes());
        }
        Message::Image(image) => {
            out.extend_from_slice(image.blob_id.as_bytes());
            out.extend_from_slice(&image.size.to_le_bytes());
            out.extend_from_slice(&image.nonce);
        }
        Message::Location(location) => {
            out.extend_from_slice(&location.encode_body()?);
        }
        Message::Video(video) => {
            push_video_body(&mut out, video);
        }
        Message::Audio(audio) => {
            push_audio_body(&mut out, audio);
        }
        Message::File(file) => {
            out.extend_from_slice(&file.encode_body()?);
        }
        Message::DeliveryReceipt(receipt) => {
            if receipt.message_ids.is_empty() {
                return Err(WireError::InvalidArgument(
                    "delivery receipt needs at least one message id".to_string(),
                ));
            }
            out.push(receipt.receipt_type);
            for id in &receipt.message_ids {
                out.extend_from_slice(id.as_bytes());
            }
        }
        Message::GroupText { group, text } => {
            group.encode_prefix(&mut out)?;
            if text.is_empty() {
                return Err(WireError::InvalidArgument(
                    "text message must not be empty".to_string(),
                ));
            }
            out.extend_from_slice(text.as_bytes());
        }
        Message::GroupLocation { group, location } => {
            group.encode_prefix(&mut out)?;
            out.extend_from_slice(&location.encode_body()?);
        }
        Message::GroupImage(image) => {
            image.group.encode_prefix(&mut out)?;
            out.extend_from_slice(image.blob_id.as_bytes());
            out.extend_from_slice(&image.size.to_le_bytes());
            out.extend_from_slice(image.key.as_bytes());
        }
        Message::GroupVideo { group, video } => {
            group.encode_prefix(&mut out)?;
            push_video_body(&mut out, video);
        }
        Message::GroupAudio { group, audio } => {
            group.encode_prefix(&mut out)?;
            push_audio_body(&mut out, audio);
        }
        Message::GroupFile { group, file } => {
            group.encode_prefix(&mut out)?;
            out.extend_from_slice(&file.encode_body()?);
        }
        Message::GroupCreate(create) => {
            if create.members.is_empty() {
                return Err(WireError::InvalidArgument(
                    "group create needs at least one member".to_string(),
                ));
            }
            out.extend_from_slice(create.group.id());
            for member in &create.members {
                out.extend_from_slice(member.as_bytes());
            }
        }
        Message::GroupRename { group, name } => {
            group.encode_prefix(&mut out)?;
            out.extend_from_slice(name.as_bytes());
        }
        Message::GroupLeave { group } => {
            group.encode_prefix(&mut out)?;
        }
        Message::GroupSetPhoto(photo) => {
            out.extend_from_slice(photo.group.id());
            out.extend_from_slice(photo.blob_id.as_bytes());
            out.extend_from_slice(&photo.size.to_le_bytes());
            out.extend_from_slice(photo.key.as_bytes());
        }
        Message::GroupRequestSync { group } => {
            out.extend_from_slice(group.id());
        }
        Message::GroupDeletePhoto { group } => {
            group.encode_prefix(&mut out)?;
        }
    }
    debug_assert_eq!(out[0], message.type_code());
    Ok(out)
}

fn push_video_body(out: &mut Vec<u8>, video: &VideoMessage) {
    out.extend_from_slice(&video.duration_secs.to_le_bytes());
    out.extend_from_slice(video.blob_id.as_bytes());
    out.extend_from_slice(&video.size.to_le_bytes());
    out.extend_from_slice(video.thumbnail_blob_id.as_bytes());
    out.extend_from_slice(&video.thumbnail_size.to_le_bytes());
    out.extend_from_slice(video.key.as_bytes());
}

fn push_audio_body(out: &mut Vec<u8>, audio: &AudioMessage) {
    out.extend_from_slice(&audio.duration_secs.to_le_bytes());
    out.extend_from_slice(audio.blob_id.as_bytes());
    out.extend_from_slice(&audio.size.to_le_bytes());
    out.extend_from_slice(audio.key.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_wire::group::{GroupId, Identity};
    use crate::core_wire::message::{codes, TextMessage};

    #[test]
    fn test_text_layout() {
        let encoded = encode(&Message::Text(TextMessage::new("hi"))).unwrap();
        assert_eq!(encoded, vec![codes::TEXT, b'h', b'i']);
    }

    #[test]
    fn test_group_leave_is_seventeen_bytes() {
        let group = GroupId::new(Identity::new("ECHOECHO").unwrap(), [0u8; 8]);
        let encoded = encode(&Message::GroupLeave { group }).unwrap();
        assert_eq!(encoded.len(), 17);
        assert_eq!(encoded[0], codes::GROUP_LEAVE);
        assert_eq!(&encoded[1..9], b"ECHOECHO");
        assert_eq!(&encoded[9..], &[0u8; 8]);
    }

    #[test]
    fn test_empty_text_rejected() {
        assert!(encode(&Message::Text(TextMessage::new(""))).is_err());
    }
}
