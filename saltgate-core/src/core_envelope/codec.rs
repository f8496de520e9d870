//! Seal/open orchestration over padding, wire format, and the crypto backend

use std::sync::Arc;

use tracing::debug;

use crate::core_crypto::{self, CryptoBackend, PrivateKey, PublicKey, NONCE_LEN};
use crate::core_wire::{self, Message};

use super::error::EnvelopeError;
use super::padding;

/// The unit exchanged with the external transport. Stateless and transient;
/// the nonce is a property of the envelope, not of the message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_LEN],
}

/// Turns typed messages into boxes and back.
///
/// All operations are synchronous and pure with respect to their inputs;
/// a codec can be shared freely across threads.
pub struct EnvelopeCodec {
    backend: Arc<dyn CryptoBackend>,
}

impl EnvelopeCodec {
    /// Build a codec over the process-wide selected backend.
    pub fn new() -> Result<Self, EnvelopeError> {
        Ok(EnvelopeCodec {
            backend: core_crypto::select()?,
        })
    }

    /// Build a codec over an explicit backend (test seam).
    pub fn with_backend(backend: Arc<dyn CryptoBackend>) -> Self {
        EnvelopeCodec { backend }
    }

    pub fn backend(&self) -> &dyn CryptoBackend {
        self.backend.as_ref()
    }

    /// Encode, pad, and box a message with a caller-supplied nonce.
    ///
    /// The nonce must be unique per sender/recipient key pair; reusing one
    /// is a security defect, and the codec cannot detect it.
    pub fn seal(
        &self,
        message: &Message,
        sender_private: &PrivateKey,
        recipient_public: &PublicKey,
        nonce: &[u8],
    ) -> Result<Vec<u8>, EnvelopeError> {
        let plaintext = core_wire::encode(message)?;
        let padded = padding::pad(self.backend.as_ref(), &plaintext)?;
        Ok(self
            .backend
            .seal_box(&padded, nonce, sender_private, recipient_public)?)
    }

    /// [`Self::seal`] with a fresh random nonce, returned alongside the box.
    pub fn seal_envelope(
        &self,
        message: &Message,
        sender_private: &PrivateKey,
        recipient_public: &PublicKey,
    ) -> Result<EncryptedEnvelope, EnvelopeError> {
        let nonce_bytes = self.backend.random_bytes(NONCE_LEN)?;
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&nonce_bytes);
        let ciphertext = self.seal(message, sender_private, recipient_public, &nonce)?;
        Ok(EncryptedEnvelope { ciphertext, nonce })
    }

    /// Open a box, strip padding, and dispatch on the type byte.
    pub fn open(
        &self,
        ciphertext: &[u8],
        recipient_private: &PrivateKey,
        sender_public: &PublicKey,
        nonce: &[u8],
    ) -> Result<Message, EnvelopeError> {
        let padded = self
            .backend
            .open_box(ciphertext, nonce, recipient_private, sender_public)
            .map_err(|e| {
                debug!(error = %e, "failed to open incoming box");
                e
            })?;
        let plaintext = padding::unpad(&padded)?;
        Ok(core_wire::decode(plaintext)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_crypto::NaclBackend;
    use crate::core_wire::TextMessage;

    fn codec() -> EnvelopeCodec {
        EnvelopeCodec::with_backend(Arc::new(NaclBackend::new()))
    }

    fn keypairs(
        codec: &EnvelopeCodec,
    ) -> (crate::core_crypto::KeyPair, crate::core_crypto::KeyPair) {
        let a = codec.backend().generate_keypair().unwrap();
        let b = codec.backend().generate_keypair().unwrap();
        (a, b)
    }

    #[test]
    fn test_text_envelope_roundtrip() {
        let codec = codec();
        let (alice, bob) = keypairs(&codec);
        let nonce = [5u8; NONCE_LEN];

        let message = Message::Text(TextMessage::new("hi"));
        let boxed = codec
            .seal(&message, &alice.private, &bob.public, &nonce)
            .unwrap();

        let opened = codec
            .open(&boxed, &bob.private, &alice.public, &nonce)
            .unwrap();
        assert_eq!(opened, message);
    }

    #[test]
    fn test_seal_envelope_carries_fresh_nonce() {
        let codec = codec();
        let (alice, bob) = keypairs(&codec);
        let message = Message::Text(TextMessage::new("nonce check"));

        let env1 = codec
            .seal_envelope(&message, &alice.private, &bob.public)
            .unwrap();
        let env2 = codec
            .seal_envelope(&message, &alice.private, &bob.public)
            .unwrap();
        assert_ne!(env1.nonce, env2.nonce);

        let opened = codec
            .open(&env1.ciphertext, &bob.private, &alice.public, &env1.nonce)
            .unwrap();
        assert_eq!(opened, message);
    }

    #[test]
    fn test_open_with_wrong_nonce_is_decryption_failure() {
        let codec = codec();
        let (alice, bob) = keypairs(&codec);
        let boxed = codec
            .seal(
                &Message::Text(TextMessage::new("hello")),
                &alice.private,
                &bob.public,
                &[1u8; NONCE_LEN],
            )
            .unwrap();

        let result = codec.open(&boxed, &bob.private, &alice.public, &[2u8; NONCE_LEN]);
        assert_eq!(result, Err(EnvelopeError::DecryptionFailed));
    }

    #[test]
    fn test_seal_rejects_bad_nonce_before_encrypting() {
        let codec = codec();
        let (alice, bob) = keypairs(&codec);
        let result = codec.seal(
            &Message::Text(TextMessage::new("x")),
            &alice.private,
            &bob.public,
            &[0u8; 12],
        );
        assert!(matches!(result, Err(EnvelopeError::InvalidArgument(_))));
    }

    #[test]
    fn test_backend_accessor_is_trait_object() {
        // the accessor must feed functions taking &dyn CryptoBackend directly
        let codec = codec();
        let padded = padding::pad(codec.backend(), b"payload").unwrap();
        assert!(padded.len() > 7);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::core_crypto::NaclBackend;
    use crate::core_wire::TextMessage;
    use proptest::prelude::*;

    // Property: seal then open reproduces the message for any text and nonce
    proptest! {
        #[test]
        fn prop_envelope_roundtrip(
            text in "[a-zA-Z0-9 ]{1,200}",
            nonce in prop::array::uniform24(any::<u8>()),
        ) {
            let codec = EnvelopeCodec::with_backend(Arc::new(NaclBackend::new()));
            let alice = codec.backend().generate_keypair().unwrap();
            let bob = codec.backend().generate_keypair().unwrap();

            let message = Message::Text(TextMessage::new(text));
            let boxed = codec.seal(&message, &alice.private, &bob.public, &nonce).unwrap();
            let opened = codec.open(&boxed, &bob.private, &alice.public, &nonce).unwrap();
            prop_assert_eq!(opened, message);
        }
    }

    // Property: flipping any single bit of the ciphertext fails authentication
    proptest! {
        #[test]
        fn prop_single_bit_flip_fails(
            flip_byte in any::<prop::sample::Index>(),
            flip_bit in 0u8..8,
        ) {
            let codec = EnvelopeCodec::with_backend(Arc::new(NaclBackend::new()));
            let alice = codec.backend().generate_keypair().unwrap();
            let bob = codec.backend().generate_keypair().unwrap();
            let nonce = [9u8; NONCE_LEN];

            let mut boxed = codec
                .seal(
                    &Message::Text(TextMessage::new("tamper target")),
                    &alice.private,
                    &bob.public,
                    &nonce,
                )
                .unwrap();
            let idx = flip_byte.index(boxed.len());
            boxed[idx] ^= 1 << flip_bit;

            let result = codec.open(&boxed, &bob.private, &alice.public, &nonce);
            prop_assert_eq!(result, Err(EnvelopeError::DecryptionFailed));
        }
    }
}
