//! [BIP-340](https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki) Schnorr keys and signatures,
//! seeded randomness and [Nostr](https://github.com/nostr-protocol/nips) events for `Secp256k1` signers.

pub use self::{
    crypto::{KeyEncoding, KeyPair, SecretKey, Signature, VerifyingKey},
    errors::{CryptoError, EventError, SeedError},
    event::{Event, EventId, UnsignedEvent},
    rng::{RngPurpose, RngSeed, SeededRng},
};

pub mod crypto;
mod errors;
pub mod event;
pub mod nip19;
pub mod rng;
#[cfg(any(test, feature = "dev"))]
pub mod test_utils;
pub mod utils;
