//! Types and abstractions for signer errors.

/// A cryptography error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// Bytes or text that do not encode a valid secp256k1 secret key.
    #[error("invalid secret key")]
    InvalidSecretKey,
    /// Bytes or text that do not encode a valid BIP-340 verifying key.
    #[error("invalid verifying key")]
    InvalidVerifyingKey,
    /// Bytes or text that do not encode a valid BIP-340 signature.
    #[error("invalid signature encoding")]
    InvalidSignatureEncoding,
    /// A well-formed signature that doesn't verify for the message and verifying key.
    #[error("invalid signature")]
    InvalidSignature,
    /// Text that is neither valid hex nor valid bech32.
    #[error("invalid encoding")]
    InvalidEncoding,
    /// A bech32 string with an unexpected human-readable prefix (e.g `npub` where `nsec` was expected).
    #[error("wrong bech32 prefix, expected `{expected}`")]
    WrongBech32Prefix {
        /// The expected human-readable prefix.
        expected: &'static str,
    },
    /// The signing backend failed to produce a signature.
    #[error("signing failed")]
    SigningFailed,
}

/// A seed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    /// Seed material that isn't valid hex.
    #[error("seed is not valid hex")]
    InvalidHex,
}

/// A Nostr event error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// The event id doesn't match the hash of the serialized event.
    #[error("event id doesn't match the event data")]
    InvalidId,
    /// The event signature doesn't verify against the event id and author.
    #[error("event signature is invalid")]
    InvalidSignature,
    /// The signing key pair doesn't belong to the event author.
    #[error("signing key doesn't match the event author")]
    AuthorMismatch,
    /// A wrapped cryptography error.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// Malformed event JSON.
    #[error("event JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for EventError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}
