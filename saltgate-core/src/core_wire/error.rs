//! Wire codec error type

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum WireError {
    /// The payload violates the layout its type byte promises.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// Type byte outside the supported set.
    #[error("unsupported message type: 0x{code:02x}")]
    UnsupportedType { code: u8 },

    /// A caller-supplied field cannot be represented on the wire.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_display_is_hex() {
        let err = WireError::UnsupportedType { code: 0x1c };
        assert_eq!(err.to_string(), "unsupported message type: 0x1c");
    }
}
