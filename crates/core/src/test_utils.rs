//! Utilities for testing.

use crate::crypto::KeyPair;
use crate::rng::{RngSeed, SEED_BYTE_SIZE};

/// Returns a fixed non-zero seed.
pub fn seed() -> RngSeed {
    RngSeed::new([0x5e; SEED_BYTE_SIZE])
}

/// Generates a key pair from the operating system's entropy source.
pub fn key_pair() -> KeyPair {
    KeyPair::generate(&mut rand::rngs::OsRng)
}
