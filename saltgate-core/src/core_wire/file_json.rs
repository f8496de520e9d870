//! File message JSON body
//!
//! File messages are the one variant whose body is UTF-8 JSON rather than
//! fixed binary. Binary values (blob ids, the symmetric key) appear as
//! lowercase hex text. Keys are single letters; `b,k,m,n,s` are required,
//! the rest optional.

use serde::{Deserialize, Serialize};

use crate::core_blob::{BlobId, SymmetricKey};

use super::error::WireError;

/// How a receiving client should present the file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum RenderingType {
    #[default]
    File,
    Media,
    Sticker,
}

impl RenderingType {
    pub fn from_code(code: u8) -> Result<Self, WireError> {
        match code {
            0 => Ok(RenderingType::File),
            1 => Ok(RenderingType::Media),
            2 => Ok(RenderingType::Sticker),
            other => Err(WireError::InvalidArgument(format!(
                "unknown rendering type: {}",
                other
            ))),
        }
    }
}

impl TryFrom<u8> for RenderingType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        RenderingType::from_code(code).map_err(|e| e.to_string())
    }
}

impl From<RenderingType> for u8 {
    fn from(rendering: RenderingType) -> u8 {
        match rendering {
            RenderingType::File => 0,
            RenderingType::Media => 1,
            RenderingType::Sticker => 2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FileMessage {
    #[serde(rename = "b")]
    pub blob_id: BlobId,

    #[serde(rename = "k")]
    pub key: SymmetricKey,

    #[serde(rename = "m")]
    pub mime_type: String,

    #[serde(rename = "n")]
    pub file_name: String,

    #[serde(rename = "s")]
    pub size: u32,

    #[serde(rename = "j", default)]
    pub rendering: RenderingType,

    /// Legacy media flag kept for old clients: 1 exactly when the rendering
    /// type is media.
    #[serde(rename = "i", default)]
    pub legacy_media: u8,

    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_blob_id: Option<BlobId>,
}

impl FileMessage {
    pub fn new(
        blob_id: BlobId,
        key: SymmetricKey,
        mime_type: impl Into<String>,
        file_name: impl Into<String>,
        size: u32,
        rendering: RenderingType,
    ) -> Self {
        FileMessage {
            blob_id,
            key,
            mime_type: mime_type.into(),
            file_name: file_name.into(),
            size,
            rendering,
            legacy_media: (rendering == RenderingType::Media) as u8,
            caption: None,
            thumbnail_blob_id: None,
        }
    }

    pub fn encode_body(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(self)
            .map_err(|e| WireError::InvalidArgument(format!("file message encoding: {}", e)))
    }

    pub fn decode_body(bytes: &[u8]) -> Result<Self, WireError> {
        serde_json::from_slice(bytes)
            .map_err(|e| WireError::Malformed(format!("file message json: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileMessage {
        FileMessage::new(
            BlobId::from_bytes([0xab; 16]),
            SymmetricKey::from_bytes([0xcd; 32]),
            "application/pdf",
            "report.pdf",
            4096,
            RenderingType::File,
        )
    }

    #[test]
    fn test_json_roundtrip() {
        let mut msg = sample();
        msg.caption = Some("quarterly numbers".to_string());
        msg.thumbnail_blob_id = Some(BlobId::from_bytes([0x01; 16]));

        let body = msg.encode_body().unwrap();
        assert_eq!(FileMessage::decode_body(&body).unwrap(), msg);
    }

    #[test]
    fn test_binary_values_are_lowercase_hex() {
        let body = sample().encode_body().unwrap();
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains(&format!("\"b\":\"{}\"", "ab".repeat(16))));
        assert!(text.contains(&format!("\"k\":\"{}\"", "cd".repeat(32))));
    }

    #[test]
    fn test_optional_keys_omitted() {
        let text = String::from_utf8(sample().encode_body().unwrap()).unwrap();
        assert!(!text.contains("\"d\""));
        assert!(!text.contains("\"t\""));
    }

    #[test]
    fn test_media_sets_legacy_flag() {
        let msg = FileMessage::new(
            BlobId::from_bytes([0; 16]),
            SymmetricKey::from_bytes([0; 32]),
            "image/jpeg",
            "photo.jpg",
            100,
            RenderingType::Media,
        );
        assert_eq!(msg.legacy_media, 1);
        assert_eq!(sample().legacy_media, 0);
    }

    #[test]
    fn test_missing_required_key_is_malformed() {
        // no "k"
        let body = br#"{"b":"00000000000000000000000000000000","m":"x","n":"y","s":1}"#;
        assert!(matches!(
            FileMessage::decode_body(body),
            Err(WireError::Malformed(_))
        ));
    }

    #[test]
    fn test_bad_rendering_type_rejected() {
        assert!(RenderingType::from_code(3).is_err());
        let body = br#"{"b":"00000000000000000000000000000000","k":"0000000000000000000000000000000000000000000000000000000000000000","m":"x","n":"y","s":1,"j":7}"#;
        assert!(FileMessage::decode_body(body).is_err());
    }
}
