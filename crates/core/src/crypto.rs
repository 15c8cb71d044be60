//! Cryptography types, abstractions and utilities.
//!
//! Keys and signatures follow [BIP-340](https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki)
//! (i.e Schnorr signatures over the `Secp256k1` elliptic curve with x-only public keys).

use k256::schnorr;
use k256::schnorr::signature::{DigestVerifier, RandomizedDigestSigner};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use zeroize::Zeroize;

use crate::errors::CryptoError;
use crate::nip19;

/// Size of a secret key or a verifying key in bytes.
pub const KEY_BYTE_SIZE: usize = 32;
/// Size of a signature in bytes.
pub const SIGNATURE_BYTE_SIZE: usize = 64;

/// A text encoding for keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEncoding {
    /// Lowercase hex.
    #[default]
    Hex,
    /// Ref: <https://github.com/nostr-protocol/nips/blob/master/19.md>.
    Bech32,
}

/// A `Secp256k1` secret key (i.e a non-zero scalar less than the order of the curve).
#[derive(Clone)]
pub struct SecretKey(k256::SecretKey);

impl SecretKey {
    /// Converts exactly 32 big-endian bytes to a secret key.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != KEY_BYTE_SIZE {
            return Err(CryptoError::InvalidSecretKey);
        }
        k256::SecretKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidSecretKey)
    }

    /// Parses a hex encoded secret key.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let mut bytes = hex::decode(hex_str.trim()).map_err(|_| CryptoError::InvalidEncoding)?;
        let result = Self::from_slice(&bytes);
        bytes.zeroize();
        result
    }

    /// Parses an `nsec` bech32 encoded secret key.
    pub fn from_bech32(bech32_str: &str) -> Result<Self, CryptoError> {
        let mut bytes = nip19::decode(nip19::PREFIX_SECRET_KEY, bech32_str)?;
        let result = Self::from_slice(&bytes);
        bytes.zeroize();
        result
    }

    /// Parses a secret key from either hex or `nsec` bech32.
    pub fn parse(key_str: &str) -> Result<Self, CryptoError> {
        if is_hex(key_str) {
            Self::from_hex(key_str)
        } else {
            Self::from_bech32(key_str)
        }
    }

    /// Returns the secret key as 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; KEY_BYTE_SIZE] {
        self.0.to_bytes().into()
    }

    /// Returns the secret key as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }

    /// Returns the secret key as `nsec` bech32.
    pub fn to_bech32(&self) -> String {
        nip19::encode(nip19::PREFIX_SECRET_KEY, &self.0.to_bytes())
    }

    /// Returns the secret key in the requested encoding.
    pub fn encode(&self, encoding: KeyEncoding) -> String {
        match encoding {
            KeyEncoding::Hex => self.to_hex(),
            KeyEncoding::Bech32 => self.to_bech32(),
        }
    }

    /// Returns the BIP-340 verifying key for this secret key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.signing_key().verifying_key().clone())
    }

    fn signing_key(&self) -> schnorr::SigningKey {
        // `SigningKey` may negate the scalar internally (BIP-340 even y), so the caller's bytes are kept in `self.0`.
        schnorr::SigningKey::from_bytes(&self.0.to_bytes())
            .expect("A valid `Secp256k1` secret key should be a valid BIP-340 signing key")
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for SecretKey {}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

impl FromStr for SecretKey {
    type Err = CryptoError;

    fn from_str(key_str: &str) -> Result<Self, Self::Err> {
        Self::parse(key_str)
    }
}

/// A BIP-340 verifying key (i.e the x-coordinate of a `Secp256k1` public key with an even y-coordinate).
#[derive(Clone)]
pub struct VerifyingKey(schnorr::VerifyingKey);

impl VerifyingKey {
    /// Converts exactly 32 bytes (an x-only public key) to a verifying key.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != KEY_BYTE_SIZE {
            return Err(CryptoError::InvalidVerifyingKey);
        }
        schnorr::VerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidVerifyingKey)
    }

    /// Parses a hex encoded verifying key.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| CryptoError::InvalidEncoding)?;
        Self::from_slice(&bytes)
    }

    /// Parses an `npub` bech32 encoded verifying key.
    pub fn from_bech32(bech32_str: &str) -> Result<Self, CryptoError> {
        Self::from_slice(&nip19::decode(nip19::PREFIX_PUBLIC_KEY, bech32_str)?)
    }

    /// Parses a verifying key from either hex or `npub` bech32.
    pub fn parse(key_str: &str) -> Result<Self, CryptoError> {
        if is_hex(key_str) {
            Self::from_hex(key_str)
        } else {
            Self::from_bech32(key_str)
        }
    }

    /// Returns the x-only public key bytes.
    pub fn to_bytes(&self) -> [u8; KEY_BYTE_SIZE] {
        self.0.to_bytes().into()
    }

    /// Returns the verifying key as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Returns the verifying key as `npub` bech32.
    pub fn to_bech32(&self) -> String {
        nip19::encode(nip19::PREFIX_PUBLIC_KEY, &self.to_bytes())
    }

    /// Returns the verifying key in the requested encoding.
    pub fn encode(&self, encoding: KeyEncoding) -> String {
        match encoding {
            KeyEncoding::Hex => self.to_hex(),
            KeyEncoding::Bech32 => self.to_bech32(),
        }
    }
}

/// A BIP-340 Schnorr signature.
#[derive(Clone)]
pub struct Signature(schnorr::Signature);

impl Signature {
    /// Converts exactly 64 bytes to a signature.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_BYTE_SIZE {
            return Err(CryptoError::InvalidSignatureEncoding);
        }
        schnorr::Signature::try_from(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidSignatureEncoding)
    }

    /// Parses a hex encoded signature.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes =
            hex::decode(hex_str.trim()).map_err(|_| CryptoError::InvalidSignatureEncoding)?;
        Self::from_slice(&bytes)
    }

    /// Returns the signature bytes.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_BYTE_SIZE] {
        self.0.to_bytes()
    }

    /// Returns the signature as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

/// Implements byte-wise comparison, hashing, hex `Display`/`FromStr`/`Debug` and hex string serde.
macro_rules! impl_hex_encoded {
    ($($type:ident => $parse_fn:ident),*$(,)?) => {
        $(
        impl PartialEq for $type {
            fn eq(&self, other: &Self) -> bool {
                self.to_bytes() == other.to_bytes()
            }
        }

        impl Eq for $type {}

        impl Hash for $type {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.to_bytes().hash(state);
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($type), self.to_hex())
            }
        }

        impl FromStr for $type {
            type Err = CryptoError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::$parse_fn(value)
            }
        }

        impl Serialize for $type {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Self::$parse_fn(&value).map_err(serde::de::Error::custom)
            }
        }
        )*
    }
}

impl_hex_encoded! {
    VerifyingKey => parse,
    Signature => from_hex,
}

/// A secret key together with its BIP-340 signing key.
#[derive(Clone)]
pub struct KeyPair {
    secret_key: SecretKey,
    signing_key: schnorr::SigningKey,
}

impl KeyPair {
    /// Initializes a key pair from a secret key.
    pub fn new(secret_key: SecretKey) -> Self {
        let signing_key = secret_key.signing_key();
        Self {
            secret_key,
            signing_key,
        }
    }

    /// Generates a key pair, see [`generate_secret_key`].
    pub fn generate(rng: &mut (impl CryptoRng + RngCore)) -> Self {
        Self::new(generate_secret_key(rng))
    }

    /// Returns the secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Returns the verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.signing_key.verifying_key().clone())
    }

    /// Signs the SHA-256 digest of `message`, drawing BIP-340 auxiliary randomness from `rng`.
    pub fn sign(
        &self,
        message: &[u8],
        rng: &mut (impl CryptoRng + RngCore),
    ) -> Result<Signature, CryptoError> {
        self.sign_digest(Sha256::new_with_prefix(message), rng)
    }

    /// Signs a SHA-256 digest (i.e the finalized digest is the signed BIP-340 message).
    pub(crate) fn sign_digest(
        &self,
        digest: Sha256,
        rng: &mut (impl CryptoRng + RngCore),
    ) -> Result<Signature, CryptoError> {
        self.signing_key
            .try_sign_digest_with_rng(rng, digest)
            .map(Signature)
            .map_err(|_| CryptoError::SigningFailed)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("verifying_key", &self.verifying_key())
            .finish_non_exhaustive()
    }
}

/// Generates a secret key from the first 32 bytes drawn from `rng` that form a valid scalar.
pub fn generate_secret_key(rng: &mut (impl CryptoRng + RngCore)) -> SecretKey {
    let mut bytes = [0u8; KEY_BYTE_SIZE];
    loop {
        rng.fill_bytes(&mut bytes);
        // Zero and values not less than the curve order are rejected (probability ~2^-128).
        if let Ok(secret_key) = SecretKey::from_slice(&bytes) {
            bytes.zeroize();
            return secret_key;
        }
    }
}

/// Signs the SHA-256 digest of `message` with `secret_key`.
pub fn sign(
    message: &[u8],
    secret_key: &SecretKey,
    rng: &mut (impl CryptoRng + RngCore),
) -> Result<Signature, CryptoError> {
    KeyPair::new(secret_key.clone()).sign(message, rng)
}

/// Returns an `Ok` result for valid signature for the message, or an appropriate `Err` result otherwise.
pub fn verify_signature(
    verifying_key: &VerifyingKey,
    message: &[u8],
    signature: &Signature,
) -> Result<(), CryptoError> {
    verify_digest(verifying_key, Sha256::new_with_prefix(message), signature)
}

/// Verifies a signature over a SHA-256 digest.
pub(crate) fn verify_digest(
    verifying_key: &VerifyingKey,
    digest: Sha256,
    signature: &Signature,
) -> Result<(), CryptoError> {
    verifying_key
        .0
        .verify_digest(digest, &signature.0)
        .map_err(|_| CryptoError::InvalidSignature)
}

/// Returns true if `value` looks like a hex string (bech32 always contains the `1` separator after a non-hex prefix).
fn is_hex(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    // BIP-340 test vector 0.
    const VECTOR_SECRET_KEY: &str =
        "0000000000000000000000000000000000000000000000000000000000000003";
    const VECTOR_VERIFYING_KEY: &str =
        "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9";

    #[test]
    fn verifying_key_derivation_matches_bip340() {
        let secret_key = SecretKey::from_hex(VECTOR_SECRET_KEY).unwrap();
        assert_eq!(secret_key.verifying_key().to_hex(), VECTOR_VERIFYING_KEY);
        // Secret key bytes are preserved even when the signing scalar is negated.
        assert_eq!(secret_key.to_hex(), VECTOR_SECRET_KEY);
        assert_eq!(
            VerifyingKey::from_hex(&VECTOR_VERIFYING_KEY.to_uppercase()).unwrap(),
            secret_key.verifying_key()
        );
    }

    #[test]
    fn key_parsing_works() {
        let key_pair = test_utils::key_pair();
        let secret_key = key_pair.secret_key();
        let verifying_key = key_pair.verifying_key();

        // Both encodings parse back to the same keys.
        for encoding in [KeyEncoding::Hex, KeyEncoding::Bech32] {
            assert_eq!(&SecretKey::parse(&secret_key.encode(encoding)).unwrap(), secret_key);
            assert_eq!(
                VerifyingKey::parse(&verifying_key.encode(encoding)).unwrap(),
                verifying_key
            );
        }
        assert!(secret_key.to_bech32().starts_with("nsec1"));
        assert!(verifying_key.to_bech32().starts_with("npub1"));

        for (input, expected) in [
            // Zero is not a valid secret key.
            ("00".repeat(32), Err(CryptoError::InvalidSecretKey)),
            // The curve order is not a valid secret key.
            (
                "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141".to_string(),
                Err(CryptoError::InvalidSecretKey),
            ),
            // Short keys are rejected rather than padded.
            ("03".to_string(), Err(CryptoError::InvalidSecretKey)),
            // A public key is not a secret key.
            (
                verifying_key.to_bech32(),
                Err(CryptoError::WrongBech32Prefix {
                    expected: nip19::PREFIX_SECRET_KEY,
                }),
            ),
            // Neither hex nor bech32.
            ("hello".to_string(), Err(CryptoError::InvalidEncoding)),
        ] {
            assert_eq!(SecretKey::parse(&input).map(|_| ()), expected);
        }

        // A secret key is not a public key.
        assert_eq!(
            VerifyingKey::parse(&secret_key.to_bech32()),
            Err(CryptoError::WrongBech32Prefix {
                expected: nip19::PREFIX_PUBLIC_KEY,
            })
        );
    }

    #[test]
    fn signing_and_verification_works() {
        let key_pair = test_utils::key_pair();
        let message = b"Hello, Nostr!";
        let signature = key_pair
            .sign(message, &mut test_utils::seed().rng(crate::rng::RngPurpose::SignatureNonce))
            .unwrap();
        assert_eq!(signature.to_hex().len(), 2 * SIGNATURE_BYTE_SIZE);

        for (verifying_key, message_to_verify, expected_result) in [
            // Valid signature should be accepted.
            (key_pair.verifying_key(), &message[..], Ok(())),
            // Tampered message should be rejected.
            (
                key_pair.verifying_key(),
                &b"Hello, Nostr?"[..],
                Err(CryptoError::InvalidSignature),
            ),
            // Wrong verifying key should be rejected.
            (
                test_utils::key_pair().verifying_key(),
                &message[..],
                Err(CryptoError::InvalidSignature),
            ),
        ] {
            assert_eq!(
                verify_signature(&verifying_key, message_to_verify, &signature),
                expected_result
            );
        }

        // Signatures survive a hex round trip.
        let parsed = Signature::from_hex(&signature.to_string()).unwrap();
        assert_eq!(parsed, signature);
        assert_eq!(
            Signature::from_hex("abcd"),
            Err(CryptoError::InvalidSignatureEncoding)
        );
    }

    #[test]
    fn signing_is_deterministic_for_a_seed() {
        let secret_key = SecretKey::from_hex(VECTOR_SECRET_KEY).unwrap();
        let seed = test_utils::seed();
        let sign_once = || {
            sign(
                b"message",
                &secret_key,
                &mut seed.rng(crate::rng::RngPurpose::SignatureNonce),
            )
            .unwrap()
        };
        assert_eq!(sign_once(), sign_once());
    }

    #[test]
    fn key_generation_is_deterministic_for_a_seed() {
        let seed = test_utils::seed();
        let key_a = generate_secret_key(&mut seed.rng(crate::rng::RngPurpose::KeyGeneration));
        let key_b = generate_secret_key(&mut seed.rng(crate::rng::RngPurpose::KeyGeneration));
        assert_eq!(key_a, key_b);

        let other = generate_secret_key(
            &mut crate::rng::RngSeed::default().rng(crate::rng::RngPurpose::KeyGeneration),
        );
        assert_ne!(key_a, other);
    }

    #[test]
    fn debug_output_hides_secret_keys() {
        let key_pair = test_utils::key_pair();
        let secret_hex = key_pair.secret_key().to_hex();
        assert!(!format!("{:?}", key_pair.secret_key()).contains(&secret_hex));
        assert!(!format!("{key_pair:?}").contains(&secret_hex));
    }
}
