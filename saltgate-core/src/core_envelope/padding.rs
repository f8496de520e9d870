//! Random-length, self-describing plaintext padding
//!
//! Before a plaintext goes into a public-key box it is extended with `p`
//! copies of the byte value `p`, where `p` is drawn uniformly from [1,255].
//! The pad obscures message length classes; it makes no constant-time
//! claims. Symmetric blob encryption does not pad.

use crate::core_crypto::CryptoBackend;

use super::error::EnvelopeError;

/// Append a random-length pad to `plaintext`, drawing the pad length from
/// the backend's CSPRNG. Output is strictly longer by 1..=255 bytes.
pub fn pad(backend: &dyn CryptoBackend, plaintext: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    let pad_len = draw_pad_len(backend)?;
    let mut padded = Vec::with_capacity(plaintext.len() + pad_len as usize);
    padded.extend_from_slice(plaintext);
    padded.resize(plaintext.len() + pad_len as usize, pad_len);
    Ok(padded)
}

/// Strip the pad. The final byte gives the pad length; at least one byte of
/// message must remain, otherwise the plaintext is malformed.
pub fn unpad(padded: &[u8]) -> Result<&[u8], EnvelopeError> {
    let last = *padded
        .last()
        .ok_or_else(|| EnvelopeError::Malformed("empty plaintext".to_string()))?;
    let remaining = padded
        .len()
        .checked_sub(last as usize)
        .filter(|&n| n >= 1)
        .ok_or_else(|| EnvelopeError::Malformed("padding longer than message".to_string()))?;
    Ok(&padded[..remaining])
}

/// Draw a uniform pad length in [1,255], redrawing on zero.
fn draw_pad_len(backend: &dyn CryptoBackend) -> Result<u8, EnvelopeError> {
    loop {
        let byte = backend.random_bytes(1)?[0];
        if byte != 0 {
            return Ok(byte);
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::core_crypto::NaclBackend;
    use proptest::prelude::*;

    // Property: padding grows the input by 1 to 255 bytes and unpad inverts it
    proptest! {
        #[test]
        fn prop_pad_unpad_identity(input in prop::collection::vec(any::<u8>(), 1..512)) {
            let backend = NaclBackend::new();
            let padded = pad(&backend, &input).unwrap();
            let growth = padded.len() - input.len();
            prop_assert!((1..=255).contains(&growth));
            prop_assert_eq!(unpad(&padded).unwrap(), &input[..]);
        }
    }
}
