//! Nostr event ids, signing and verification.
//!
//! Ref: <https://github.com/nostr-protocol/nips/blob/master/01.md>.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::fmt;

use crate::crypto::{self, KeyPair, Signature, VerifyingKey};
use crate::errors::{CryptoError, EventError};
use crate::{nip19, utils};

/// Size of an event id in bytes.
pub const EVENT_ID_SIZE: usize = 32;

/// An event id (i.e the SHA-256 hash of the serialized event data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId([u8; EVENT_ID_SIZE]);

impl EventId {
    /// Converts exactly 32 bytes to an event id.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EventError> {
        bytes.try_into().map(Self).map_err(|_| EventError::InvalidId)
    }

    /// Parses an event id from either hex or `note` bech32.
    pub fn parse(id_str: &str) -> Result<Self, EventError> {
        match hex::decode(id_str.trim()) {
            Ok(bytes) => Self::from_slice(&bytes),
            Err(_) => Self::from_slice(&nip19::decode(nip19::PREFIX_NOTE_ID, id_str)?),
        }
    }

    /// Returns the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; EVENT_ID_SIZE] {
        &self.0
    }

    /// Returns the event id as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the event id as `note` bech32.
    pub fn to_bech32(&self) -> String {
        nip19::encode(nip19::PREFIX_NOTE_ID, &self.0)
    }

    /// Returns true if the id has at least `difficulty` leading zero bits.
    ///
    /// Ref: <https://github.com/nostr-protocol/nips/blob/master/13.md>.
    pub fn check_pow(&self, difficulty: u8) -> bool {
        utils::leading_zero_bits(&self.0) >= u32::from(difficulty)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for EventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Event data before signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedEvent {
    /// Author.
    pub pubkey: VerifyingKey,
    /// Unix timestamp in seconds.
    pub created_at: u64,
    /// Event kind.
    pub kind: u16,
    /// Tags, each a non-empty list of strings.
    pub tags: Vec<Vec<String>>,
    /// Arbitrary content.
    pub content: String,
}

impl UnsignedEvent {
    /// Initializes an unsigned event.
    pub fn new(
        pubkey: VerifyingKey,
        created_at: u64,
        kind: u16,
        tags: Vec<Vec<String>>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            pubkey,
            created_at,
            kind,
            tags,
            content: content.into(),
        }
    }

    /// Initializes an unsigned event authored by `pubkey` timestamped with the current time.
    pub fn now(
        pubkey: VerifyingKey,
        kind: u16,
        tags: Vec<Vec<String>>,
        content: impl Into<String>,
    ) -> Self {
        Self::new(pubkey, utils::unix_timestamp(), kind, tags, content)
    }

    /// Returns the event id.
    pub fn id(&self) -> Result<EventId, EventError> {
        Ok(EventId(self.digest()?.finalize().into()))
    }

    /// Signs the event, the key pair must belong to the author.
    pub fn sign(
        self,
        key_pair: &KeyPair,
        rng: &mut (impl CryptoRng + RngCore),
    ) -> Result<Event, EventError> {
        if key_pair.verifying_key() != self.pubkey {
            return Err(EventError::AuthorMismatch);
        }
        let digest = self.digest()?;
        let id = EventId(digest.clone().finalize().into());
        let sig = key_pair.sign_digest(digest, rng)?;
        Ok(Event {
            id,
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
            sig,
        })
    }

    /// Returns the digest of the canonical serialization `[0, pubkey, created_at, kind, tags, content]`.
    fn digest(&self) -> Result<Sha256, EventError> {
        let serialized = serde_json::to_string(&(
            0,
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        ))?;
        Ok(Sha256::new_with_prefix(serialized.as_bytes()))
    }
}

/// A signed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event id.
    pub id: EventId,
    /// Author.
    pub pubkey: VerifyingKey,
    /// Unix timestamp in seconds.
    pub created_at: u64,
    /// Event kind.
    pub kind: u16,
    /// Tags.
    pub tags: Vec<Vec<String>>,
    /// Content.
    pub content: String,
    /// BIP-340 signature of the event id by the author.
    pub sig: Signature,
}

impl Event {
    /// Deserializes an event from JSON.
    ///
    /// NOTE: Neither the id nor the signature is verified, see [`Event::verify`].
    pub fn from_json(json: impl AsRef<[u8]>) -> Result<Self, EventError> {
        Ok(serde_json::from_slice(json.as_ref())?)
    }

    /// Serializes the event to JSON.
    pub fn as_json(&self) -> Result<String, EventError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns the unsigned event data.
    pub fn unsigned(&self) -> UnsignedEvent {
        UnsignedEvent::new(
            self.pubkey.clone(),
            self.created_at,
            self.kind,
            self.tags.clone(),
            self.content.clone(),
        )
    }

    /// Returns an `Ok` result if the id matches the event data.
    pub fn verify_id(&self) -> Result<(), EventError> {
        if self.unsigned().id()? == self.id {
            Ok(())
        } else {
            Err(EventError::InvalidId)
        }
    }

    /// Returns an `Ok` result if the signature verifies against the author and the event data.
    pub fn verify_signature(&self) -> Result<(), EventError> {
        crypto::verify_digest(&self.pubkey, self.unsigned().digest()?, &self.sig).map_err(
            |error| match error {
                CryptoError::InvalidSignature => EventError::InvalidSignature,
                other => EventError::Crypto(other),
            },
        )
    }

    /// Verifies both the id and the signature.
    pub fn verify(&self) -> Result<(), EventError> {
        self.verify_id()?;
        self.verify_signature()
    }

    /// Returns true if the id has at least `difficulty` leading zero bits.
    pub fn check_pow(&self, difficulty: u8) -> bool {
        self.id.check_pow(difficulty)
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    /// Ascending by creation time, ties broken by id.
    fn cmp(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}
