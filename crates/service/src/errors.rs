//! Types and abstractions for service errors.

use nostr_signer_core::{CryptoError, EventError, SeedError};

/// A service error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// A wrapped cryptography error from `nostr-signer-core`.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// A wrapped seed error from `nostr-signer-core`.
    #[error(transparent)]
    Seed(#[from] SeedError),
    /// A wrapped event error from `nostr-signer-core`.
    #[error(transparent)]
    Event(#[from] EventError),
}
