//! A [BIP-340](https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki) Schnorr signing service for
//! [Nostr](https://github.com/nostr-protocol/nips) keys, backed by a random generator whose seed can be replaced at runtime.

pub use self::{
    dispatch::{dispatch, dispatch_json, Request, Response},
    errors::ServiceError,
    seed_store::SeedStore,
    service::{KeyInfo, SignatureInfo, SignerService},
};

pub mod config;
pub mod dispatch;
mod errors;
mod seed_store;
mod service;
