//! Message decoding: type-byte dispatch table plus per-variant body parsers
//!
//! Each recognized type code has one table entry carrying the expected body
//! length (exact or a minimum) and a parse function. Unknown codes fail with
//! [`WireError::UnsupportedType`]; recognized codes with bodies that violate
//! their layout fail with [`WireError::Malformed`]. Nothing is guessed or
//! coerced.

use crate::core_blob::{BlobId, SymmetricKey, BLOB_ID_LEN, SYMMETRIC_KEY_LEN};
use crate::core_crypto::NONCE_LEN;

use super::error::WireError;
use super::file_json::FileMessage;
use super::group::{GroupId, Identity, GROUP_ID_LEN, GROUP_PREFIX_LEN, IDENTITY_LEN};
use super::location::LocationMessage;
use super::message::{
    codes, AudioMessage, DeliveryReceiptMessage, GroupCreateMessage, GroupImageMessage,
    GroupSetPhotoMessage, ImageMessage, Message, MessageId, VideoMessage, MESSAGE_ID_LEN,
};

/// Body length constraint for a type code (excludes the type byte).
#[derive(Debug, Clone, Copy)]
enum Length {
    Fixed(usize),
    Variable { min: usize },
}

struct WireEntry {
    code: u8,
    name: &'static str,
    length: Length,
    parse: fn(&[u8]) -> Result<Message, WireError>,
}

const VIDEO_BODY_LEN: usize = 2 + BLOB_ID_LEN + 4 + BLOB_ID_LEN + 4 + SYMMETRIC_KEY_LEN;
const AUDIO_BODY_LEN: usize = 2 + BLOB_ID_LEN + 4 + SYMMETRIC_KEY_LEN;

static TABLE: &[WireEntry] = &[
    WireEntry {
        code: codes::TEXT,
        name: "text",
        length: Length::Variable { min: 1 },
        parse: parse_text,
    },
    WireEntry {
        code: codes::IMAGE,
        name: "image",
        length: Length::Fixed(BLOB_ID_LEN + 4 + NONCE_LEN),
        parse: parse_image,
    },
    WireEntry {
        code: codes::LOCATION,
        name: "location",
        length: Length::Variable { min: 3 },
        parse: parse_location,
    },
    WireEntry {
        code: codes::VIDEO,
        name: "video",
        length: Length::Fixed(VIDEO_BODY_LEN),
        parse: parse_video,
    },
    WireEntry {
        code: codes::AUDIO,
        name: "audio",
        length: Length::Fixed(AUDIO_BODY_LEN),
        parse: parse_audio,
    },
    WireEntry {
        code: codes::FILE,
        name: "file",
        length: Length::Variable { min: 2 },
        parse: parse_file,
    },
    WireEntry {
        code: codes::GROUP_TEXT,
        name: "group_text",
        length: Length::Variable {
            min: GROUP_PREFIX_LEN + 1,
        },
        parse: parse_group_text,
    },
    WireEntry {
        code: codes::GROUP_LOCATION,
        name: "group_location",
        length: Length::Variable {
            min: GROUP_PREFIX_LEN + 3,
        },
        parse: parse_group_location,
    },
    WireEntry {
        code: codes::GROUP_IMAGE,
        name: "group_image",
        length: Length::Fixed(GROUP_PREFIX_LEN + BLOB_ID_LEN + 4 + SYMMETRIC_KEY_LEN),
        parse: parse_group_image,
    },
    WireEntry {
        code: codes::GROUP_VIDEO,
        name: "group_video",
        length: Length::Fixed(GROUP_PREFIX_LEN + VIDEO_BODY_LEN),
        parse: parse_group_video,
    },
    WireEntry {
        code: codes::GROUP_AUDIO,
        name: "group_audio",
        length: Length::Fixed(GROUP_PREFIX_LEN + AUDIO_BODY_LEN),
        parse: parse_group_audio,
    },
    WireEntry {
        code: codes::GROUP_FILE,
        name: "group_file",
        length: Length::Variable {
            min: GROUP_PREFIX_LEN + 2,
        },
        parse: parse_group_file,
    },
    WireEntry {
        code: codes::GROUP_CREATE,
        name: "group_create",
        length: Length::Variable {
            min: GROUP_ID_LEN + IDENTITY_LEN,
        },
        parse: parse_group_create,
    },
    WireEntry {
        code: codes::GROUP_RENAME,
        name: "group_rename",
        length: Length::Variable {
            min: GROUP_PREFIX_LEN,
        },
        parse: parse_group_rename,
    },
    WireEntry {
        code: codes::GROUP_LEAVE,
        name: "group_leave",
        length: Length::Fixed(GROUP_PREFIX_LEN),
        parse: parse_group_leave,
    },
    WireEntry {
        code: codes::GROUP_SET_PHOTO,
        name: "group_set_photo",
        length: Length::Fixed(GROUP_ID_LEN + BLOB_ID_LEN + 4 + SYMMETRIC_KEY_LEN),
        parse: parse_group_set_photo,
    },
    WireEntry {
        code: codes::GROUP_REQUEST_SYNC,
        name: "group_request_sync",
        length: Length::Fixed(GROUP_ID_LEN),
        parse: parse_group_request_sync,
    },
    WireEntry {
        code: codes::GROUP_DELETE_PHOTO,
        name: "group_delete_photo",
        length: Length::Fixed(GROUP_PREFIX_LEN),
        parse: parse_group_delete_photo,
    },
    WireEntry {
        code: codes::DELIVERY_RECEIPT,
        name: "delivery_receipt",
        length: Length::Variable {
            min: 1 + MESSAGE_ID_LEN,
        },
        parse: parse_delivery_receipt,
    },
];

/// Decode a full plaintext (type byte followed by the body) into a typed
/// message.
pub fn decode(plaintext: &[u8]) -> Result<Message, WireError> {
    let (&code, body) = plaintext
        .split_first()
        .ok_or_else(|| WireError::Malformed("empty message".to_string()))?;

    let entry = TABLE
        .iter()
        .find(|e| e.code == code)
        .ok_or(WireError::UnsupportedType { code })?;

    match entry.length {
        Length::Fixed(expected) if body.len() != expected => {
            return Err(WireError::Malformed(format!(
                "{} body must be {} bytes, got {}",
                entry.name,
                expected,
                body.len()
            )));
        }
        Length::Variable { min } if body.len() < min => {
            return Err(WireError::Malformed(format!(
                "{} body needs at least {} bytes, got {}",
                entry.name,
                min,
                body.len()
            )));
        }
        _ => {}
    }

    (entry.parse)(body)
}

/// Byte cursor over a message body. Length checks happen against the table
/// before parsing, so reads past the end indicate an internal layout bug
/// rather than bad input; they still surface as Malformed.
struct Reader<'a> {
    body: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(body: &'a [u8]) -> Self {
        Reader { body }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        if self.body.len() < n {
            return Err(WireError::Malformed(format!(
                "truncated body: wanted {} more bytes, have {}",
                n,
                self.body.len()
            )));
        }
        let (head, tail) = self.body.split_at(n);
        self.body = tail;
        Ok(head)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn take_u32_le(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_le_bytes(self.take_array::<4>()?))
    }

    fn take_i16_le(&mut self) -> Result<i16, WireError> {
        Ok(i16::from_le_bytes(self.take_array::<2>()?))
    }

    fn blob_id(&mut self) -> Result<BlobId, WireError> {
        Ok(BlobId::from_bytes(self.take_array::<BLOB_ID_LEN>()?))
    }

    fn symmetric_key(&mut self) -> Result<SymmetricKey, WireError> {
        Ok(SymmetricKey::from_bytes(
            self.take_array::<SYMMETRIC_KEY_LEN>()?,
        ))
    }

    fn group_prefix(&mut self) -> Result<GroupId, WireError> {
        let prefix = self.take(GROUP_PREFIX_LEN)?;
        GroupId::decode_prefix(prefix)
    }

    fn rest(self) -> &'a [u8] {
        self.body
    }
}

fn utf8(bytes: &[u8], what: &str) -> Result<String, WireError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| WireError::Malformed(format!("{} is not UTF-8", what)))
}

fn parse_text(body: &[u8]) -> Result<Message, WireError> {
    Ok(Message::Text(super::message::TextMessage {
        text: utf8(body, "text body")?,
    }))
}

fn parse_image(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    Ok(Message::Image(ImageMessage {
        blob_id: r.blob_id()?,
        size: r.take_u32_le()?,
        nonce: r.take_array::<NONCE_LEN>()?,
    }))
}

fn parse_location(body: &[u8]) -> Result<Message, WireError> {
    Ok(Message::Location(LocationMessage::decode_body(body)?))
}

fn parse_video_body(r: &mut Reader<'_>) -> Result<VideoMessage, WireError> {
    Ok(VideoMessage {
        duration_secs: r.take_i16_le()?,
        blob_id: r.blob_id()?,
        size: r.take_u32_le()?,
        thumbnail_blob_id: r.blob_id()?,
        thumbnail_size: r.take_u32_le()?,
        key: r.symmetric_key()?,
    })
}

fn parse_audio_body(r: &mut Reader<'_>) -> Result<AudioMessage, WireError> {
    Ok(AudioMessage {
        duration_secs: r.take_i16_le()?,
        blob_id: r.blob_id()?,
        size: r.take_u32_le()?,
        key: r.symmetric_key()?,
    })
}

fn parse_video(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    Ok(Message::Video(parse_video_body(&mut r)?))
}

fn parse_audio(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    Ok(Message::Audio(parse_audio_body(&mut r)?))
}

fn parse_file(body: &[u8]) -> Result<Message, WireError> {
    Ok(Message::File(FileMessage::decode_body(body)?))
}

fn parse_group_text(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    let group = r.group_prefix()?;
    let text = utf8(r.rest(), "group text body")?;
    Ok(Message::GroupText { group, text })
}

fn parse_group_location(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    let group = r.group_prefix()?;
    let location = LocationMessage::decode_body(r.rest())?;
    Ok(Message::GroupLocation { group, location })
}

fn parse_group_image(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    Ok(Message::GroupImage(GroupImageMessage {
        group: r.group_prefix()?,
        blob_id: r.blob_id()?,
        size: r.take_u32_le()?,
        key: r.symmetric_key()?,
    }))
}

fn parse_group_video(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    let group = r.group_prefix()?;
    let video = parse_video_body(&mut r)?;
    Ok(Message::GroupVideo { group, video })
}

fn parse_group_audio(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    let group = r.group_prefix()?;
    let audio = parse_audio_body(&mut r)?;
    Ok(Message::GroupAudio { group, audio })
}

fn parse_group_file(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    let group = r.group_prefix()?;
    let file = FileMessage::decode_body(r.rest())?;
    Ok(Message::GroupFile { group, file })
}

fn parse_group_create(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    let group = GroupId::bare(r.take_array::<GROUP_ID_LEN>()?);
    let rest = r.rest();
    if rest.is_empty() || rest.len() % IDENTITY_LEN != 0 {
        return Err(WireError::Malformed(format!(
            "group create member list length {} is not a multiple of {}",
            rest.len(),
            IDENTITY_LEN
        )));
    }
    let members = rest
        .chunks_exact(IDENTITY_LEN)
        .map(|chunk| {
            let mut buf = [0u8; IDENTITY_LEN];
            buf.copy_from_slice(chunk);
            Identity::from_bytes(buf)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Message::GroupCreate(GroupCreateMessage { group, members }))
}

fn parse_group_rename(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    let group = r.group_prefix()?;
    let name = utf8(r.rest(), "group name")?;
    Ok(Message::GroupRename { group, name })
}

fn parse_group_leave(body: &[u8]) -> Result<Message, WireError> {
    Ok(Message::GroupLeave {
        group: GroupId::decode_prefix(body)?,
    })
}

fn parse_group_set_photo(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    Ok(Message::GroupSetPhoto(GroupSetPhotoMessage {
        group: GroupId::bare(r.take_array::<GROUP_ID_LEN>()?),
        blob_id: r.blob_id()?,
        size: r.take_u32_le()?,
        key: r.symmetric_key()?,
    }))
}

fn parse_group_request_sync(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    Ok(Message::GroupRequestSync {
        group: GroupId::bare(r.take_array::<GROUP_ID_LEN>()?),
    })
}

fn parse_group_delete_photo(body: &[u8]) -> Result<Message, WireError> {
    Ok(Message::GroupDeletePhoto {
        group: GroupId::decode_prefix(body)?,
    })
}

fn parse_delivery_receipt(body: &[u8]) -> Result<Message, WireError> {
    let mut r = Reader::new(body);
    let receipt_type = r.take_array::<1>()?[0];
    let rest = r.rest();
    if rest.is_empty() || rest.len() % MESSAGE_ID_LEN != 0 {
        return Err(WireError::Malformed(format!(
            "delivery receipt id list length {} is not a multiple of {}",
            rest.len(),
            MESSAGE_ID_LEN
        )));
    }
    let message_ids = rest
        .chunks_exact(MESSAGE_ID_LEN)
        .map(|chunk| {
            let mut buf = [0u8; MESSAGE_ID_LEN];
            buf.copy_from_slice(chunk);
            MessageId::from_bytes(buf)
        })
        .collect();
    Ok(Message::DeliveryReceipt(DeliveryReceiptMessage {
        receipt_type,
        message_ids,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::encode::encode;
    use super::*;
    use crate::core_wire::file_json::RenderingType;
    use crate::core_wire::message::{receipt, TextMessage};

    fn group() -> GroupId {
        GroupId::new(Identity::new("ECHOECHO").unwrap(), [7u8; 8])
    }

    fn video() -> VideoMessage {
        VideoMessage {
            duration_secs: 42,
            blob_id: BlobId::from_bytes([1; 16]),
            size: 1000,
            thumbnail_blob_id: BlobId::from_bytes([2; 16]),
            thumbnail_size: 100,
            key: SymmetricKey::from_bytes([3; 32]),
        }
    }

    fn audio() -> AudioMessage {
        AudioMessage {
            duration_secs: 7,
            blob_id: BlobId::from_bytes([4; 16]),
            size: 500,
            key: SymmetricKey::from_bytes([5; 32]),
        }
    }

    fn all_variants() -> Vec<Message> {
        vec![
            Message::Text(TextMessage::new("hello")),
            Message::Image(ImageMessage {
                blob_id: BlobId::from_bytes([9; 16]),
                size: 2048,
                nonce: [6; 24],
            }),
            Message::Location(LocationMessage {
                latitude: 47.376888,
                longitude: 8.541694,
                accuracy: 12.0,
                poi_name: Some("Station".to_string()),
                poi_address: Some("Platform 3\nZurich".to_string()),
            }),
            Message::Video(video()),
            Message::Audio(audio()),
            Message::File(FileMessage::new(
                BlobId::from_bytes([8; 16]),
                SymmetricKey::from_bytes([9; 32]),
                "text/plain",
                "notes.txt",
                64,
                RenderingType::File,
            )),
            Message::DeliveryReceipt(DeliveryReceiptMessage {
                receipt_type: receipt::READ,
                message_ids: vec![
                    MessageId::from_bytes([1; 8]),
                    MessageId::from_bytes([2; 8]),
                ],
            }),
            Message::GroupText {
                group: group(),
                text: "hello group".to_string(),
            },
            Message::GroupLocation {
                group: group(),
                location: LocationMessage::new(1.0, 2.0),
            },
            Message::GroupImage(GroupImageMessage {
                group: group(),
                blob_id: BlobId::from_bytes([3; 16]),
                size: 99,
                key: SymmetricKey::from_bytes([4; 32]),
            }),
            Message::GroupVideo {
                group: group(),
                video: video(),
            },
            Message::GroupAudio {
                group: group(),
                audio: audio(),
            },
            Message::GroupFile {
                group: group(),
                file: FileMessage::new(
                    BlobId::from_bytes([5; 16]),
                    SymmetricKey::from_bytes([6; 32]),
                    "image/png",
                    "chart.png",
                    128,
                    RenderingType::Media,
                ),
            },
            Message::GroupCreate(GroupCreateMessage {
                group: GroupId::bare([7; 8]),
                members: vec![
                    Identity::new("AAAA1111").unwrap(),
                    Identity::new("BBBB2222").unwrap(),
                ],
            }),
            Message::GroupRename {
                group: group(),
                name: "new name".to_string(),
            },
            Message::GroupLeave { group: group() },
            Message::GroupSetPhoto(GroupSetPhotoMessage {
                group: GroupId::bare([7; 8]),
                blob_id: BlobId::from_bytes([8; 16]),
                size: 77,
                key: SymmetricKey::from_bytes([9; 32]),
            }),
            Message::GroupRequestSync {
                group: GroupId::bare([7; 8]),
            },
            Message::GroupDeletePhoto { group: group() },
        ]
    }

    #[test]
    fn test_all_variants_roundtrip() {
        for message in all_variants() {
            let encoded = encode(&message).unwrap();
            assert_eq!(encoded[0], message.type_code());
            let decoded = decode(&encoded)
                .unwrap_or_else(|e| panic!("{} failed to decode: {}", message.type_name(), e));
            assert_eq!(decoded, message, "{} did not roundtrip", message.type_name());
        }
    }

    #[test]
    fn test_unknown_type_code() {
        assert_eq!(
            decode(&[0x1c, 0, 0]),
            Err(WireError::UnsupportedType { code: 0x1c })
        );
    }

    #[test]
    fn test_empty_plaintext() {
        assert!(matches!(decode(&[]), Err(WireError::Malformed(_))));
    }

    #[test]
    fn test_truncated_fixed_body() {
        // image needs exactly 44 body bytes
        let mut buf = vec![codes::IMAGE];
        buf.extend_from_slice(&[0u8; 43]);
        assert!(matches!(decode(&buf), Err(WireError::Malformed(_))));

        // and over-long fixed bodies are rejected too
        let mut buf = vec![codes::GROUP_LEAVE];
        buf.extend_from_slice(b"ECHOECHO");
        buf.extend_from_slice(&[0u8; 9]);
        assert!(matches!(decode(&buf), Err(WireError::Malformed(_))));
    }

    #[test]
    fn test_ragged_member_list_rejected() {
        let mut buf = vec![codes::GROUP_CREATE];
        buf.extend_from_slice(&[7u8; 8]);
        buf.extend_from_slice(b"AAAA1111");
        buf.push(b'B');
        assert!(matches!(decode(&buf), Err(WireError::Malformed(_))));
    }

    #[test]
    fn test_receipt_without_ids_rejected() {
        assert!(matches!(
            decode(&[codes::DELIVERY_RECEIPT, receipt::RECEIVED]),
            Err(WireError::Malformed(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_text_rejected() {
        assert!(matches!(
            decode(&[codes::TEXT, 0xff, 0xfe]),
            Err(WireError::Malformed(_))
        ));
    }
}
