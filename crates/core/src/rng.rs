//! Seed material and seeded random number generators.

use rand::RngCore;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::SeedError;

/// Size of a seed in bytes.
pub const SEED_BYTE_SIZE: usize = 32;

/// The cryptographically secure generator used for key generation and signing.
pub type SeededRng = ChaCha20Rng;

/// Seed material for a [`SeededRng`].
///
/// Defaults to all zeros.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RngSeed([u8; SEED_BYTE_SIZE]);

impl RngSeed {
    /// Initializes a seed from exactly [`SEED_BYTE_SIZE`] bytes.
    pub fn new(bytes: [u8; SEED_BYTE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Generates a fresh seed from the operating system's entropy source.
    pub fn random() -> Self {
        let mut bytes = [0u8; SEED_BYTE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Decodes a seed from hex, see [`RngSeed::assign_bytes`] for how lengths other than 32 bytes are handled.
    pub fn from_hex(hex_str: &str) -> Result<Self, SeedError> {
        let mut seed = Self::default();
        seed.assign_hex(hex_str)?;
        Ok(seed)
    }

    /// Overwrites the seed with the first 32 bytes of `buffer`.
    ///
    /// Shorter inputs are zero padded on the right, extra input bytes are ignored.
    pub fn assign_bytes(&mut self, buffer: &[u8]) {
        let len = SEED_BYTE_SIZE.min(buffer.len());
        self.0[..len].copy_from_slice(&buffer[..len]);
        self.0[len..].fill(0);
    }

    /// Hex decodes `hex_str` and assigns the result, leaving the seed untouched on error.
    pub fn assign_hex(&mut self, hex_str: &str) -> Result<(), SeedError> {
        let mut buffer = hex::decode(hex_str.trim()).map_err(|_| SeedError::InvalidHex)?;
        self.assign_bytes(&buffer);
        buffer.zeroize();
        Ok(())
    }

    /// Returns the seed as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; SEED_BYTE_SIZE] {
        &self.0
    }

    /// Returns a generator seeded with this seed, on the keystream reserved for `purpose`.
    pub fn rng(&self, purpose: RngPurpose) -> SeededRng {
        let mut rng = ChaCha20Rng::from_seed(self.0);
        rng.set_stream(purpose.stream());
        rng
    }
}

impl fmt::Debug for RngSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RngSeed(..)")
    }
}

/// What a seeded generator is used for.
///
/// Each purpose reads from its own ChaCha20 stream, so a generated key never doubles as signing randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngPurpose {
    /// Secret key generation.
    KeyGeneration,
    /// BIP-340 auxiliary randomness for signing.
    SignatureNonce,
}

impl RngPurpose {
    fn stream(self) -> u64 {
        match self {
            RngPurpose::KeyGeneration => 0,
            RngPurpose::SignatureNonce => 1,
        }
    }
}
