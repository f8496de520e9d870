//! Group addressing: identities, group ids, and the 16-byte group prefix
//!
//! Every group-scoped message opens with the group creator's identity
//! followed by the 8-byte group id. The two together name the group;
//! neither alone is unique.

use std::fmt;

use super::error::WireError;

/// Length of an account identity in bytes.
pub const IDENTITY_LEN: usize = 8;

/// Length of a group id in bytes.
pub const GROUP_ID_LEN: usize = 8;

/// Length of the creator-identity + group-id prefix.
pub const GROUP_PREFIX_LEN: usize = IDENTITY_LEN + GROUP_ID_LEN;

/// An 8-character account identity. Uppercase letters, digits, and `*`
/// (gateway accounts) only, so it always round-trips through ASCII.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity([u8; IDENTITY_LEN]);

impl Identity {
    pub fn new(s: &str) -> Result<Self, WireError> {
        let bytes = s.as_bytes();
        if bytes.len() != IDENTITY_LEN {
            return Err(WireError::InvalidArgument(format!(
                "identity must be {} characters, got {}",
                IDENTITY_LEN,
                bytes.len()
            )));
        }
        if !bytes
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || *b == b'*')
        {
            return Err(WireError::InvalidArgument(format!(
                "identity contains invalid characters: {:?}",
                s
            )));
        }
        let mut buf = [0u8; IDENTITY_LEN];
        buf.copy_from_slice(bytes);
        Ok(Identity(buf))
    }

    pub fn from_bytes(bytes: [u8; IDENTITY_LEN]) -> Result<Self, WireError> {
        let s = std::str::from_utf8(&bytes)
            .map_err(|_| WireError::Malformed("identity is not ASCII".to_string()))?;
        Identity::new(s)
    }

    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // constructor guarantees ASCII
        std::str::from_utf8(&self.0).unwrap_or("????????")
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.as_str())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group handle: the 8-byte id plus, once known, the creator identity.
///
/// The creator is set exactly once. A sync request arrives without its
/// creator (the recipient already knows it), so the field stays optional
/// until the surrounding context fills it in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GroupId {
    id: [u8; GROUP_ID_LEN],
    creator: Option<Identity>,
}

impl GroupId {
    pub fn new(creator: Identity, id: [u8; GROUP_ID_LEN]) -> Self {
        GroupId {
            id,
            creator: Some(creator),
        }
    }

    /// A group id whose creator is not yet known.
    pub fn bare(id: [u8; GROUP_ID_LEN]) -> Self {
        GroupId { id, creator: None }
    }

    pub fn id(&self) -> &[u8; GROUP_ID_LEN] {
        &self.id
    }

    pub fn creator(&self) -> Option<&Identity> {
        self.creator.as_ref()
    }

    /// Fill in the creator. Errors if a different creator is already set.
    pub fn set_creator(&mut self, creator: Identity) -> Result<(), WireError> {
        match self.creator {
            None => {
                self.creator = Some(creator);
                Ok(())
            }
            Some(existing) if existing == creator => Ok(()),
            Some(existing) => Err(WireError::InvalidArgument(format!(
                "group creator already set to {}",
                existing
            ))),
        }
    }

    /// Append the 16-byte creator + id prefix. Errors if the creator is
    /// unknown.
    pub fn encode_prefix(&self, out: &mut Vec<u8>) -> Result<(), WireError> {
        let creator = self.creator.ok_or_else(|| {
            WireError::InvalidArgument("group creator required for this message".to_string())
        })?;
        out.extend_from_slice(creator.as_bytes());
        out.extend_from_slice(&self.id);
        Ok(())
    }

    /// Parse a 16-byte creator + id prefix.
    pub fn decode_prefix(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() < GROUP_PREFIX_LEN {
            return Err(WireError::Malformed(format!(
                "group prefix needs {} bytes, got {}",
                GROUP_PREFIX_LEN,
                bytes.len()
            )));
        }
        let mut creator = [0u8; IDENTITY_LEN];
        creator.copy_from_slice(&bytes[..IDENTITY_LEN]);
        let creator = Identity::from_bytes(creator)?;
        let mut id = [0u8; GROUP_ID_LEN];
        id.copy_from_slice(&bytes[IDENTITY_LEN..GROUP_PREFIX_LEN]);
        Ok(GroupId::new(creator, id))
    }
}
