//! The signing service.

use nostr_signer_core::crypto;
use nostr_signer_core::{
    Event, KeyPair, RngPurpose, RngSeed, SecretKey, Signature, UnsignedEvent, VerifyingKey,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::ServiceError;
use crate::seed_store::SeedStore;

/// A signature together with the verifying key it was produced for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureInfo {
    /// Hex encoded BIP-340 signature (64 bytes).
    pub signature_str: String,
    /// Hex encoded x-only verifying key (32 bytes).
    pub verifying_key: String,
}

/// A generated key pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct KeyInfo {
    /// Hex encoded secret key.
    pub secret_key: String,
    /// Hex encoded x-only verifying key.
    pub verifying_key: String,
}

impl fmt::Debug for KeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyInfo")
            .field("verifying_key", &self.verifying_key)
            .finish_non_exhaustive()
    }
}

/// Generates keys, signs and verifies messages and events using generators derived from a replaceable seed.
///
/// All operations except [`SignerService::update_rng_seed`] are read-only:
/// the same seed always yields the same generated key and the same signatures.
#[derive(Debug, Default)]
pub struct SignerService {
    seeds: SeedStore,
}

impl SignerService {
    /// Initializes a service with `seed`.
    pub fn new(seed: RngSeed) -> Self {
        Self {
            seeds: SeedStore::new(seed),
        }
    }

    /// Generates a secret key from the current seed and returns it as hex.
    pub fn generate_key(&self) -> String {
        debug!("generating key");
        self.generate_key_pair().secret_key().to_hex()
    }

    /// Generates a key pair from the current seed.
    pub fn generate_keypair(&self) -> KeyInfo {
        let key_pair = self.generate_key_pair();
        debug!(verifying_key = %key_pair.verifying_key(), "generated key pair");
        KeyInfo {
            secret_key: key_pair.secret_key().to_hex(),
            verifying_key: key_pair.verifying_key().to_hex(),
        }
    }

    /// Greets `name`, or the verifying key of `name` if it is a secret key.
    pub fn greet(&self, name: &str) -> String {
        match SecretKey::parse(name) {
            Ok(secret_key) => format!("Hello, {}!", secret_key.verifying_key()),
            Err(_) => format!("Hello, {name}!"),
        }
    }

    /// Returns the current seed as lowercase hex.
    pub fn rng_seed(&self) -> String {
        self.seeds.to_hex()
    }

    /// Replaces the seed with hex encoded seed material.
    pub fn update_rng_seed(&self, seed_hex: &str) -> Result<(), ServiceError> {
        self.seeds.update_from_hex(seed_hex).map_err(|error| {
            warn!(%error, "rejected seed update");
            ServiceError::from(error)
        })?;
        info!("rng seed updated");
        Ok(())
    }

    /// Signs `msg` with the secret key (hex or `nsec` bech32) and returns the signature and verifying key.
    pub fn schnorr_signature(
        &self,
        msg: &str,
        secret_key_str: &str,
    ) -> Result<SignatureInfo, ServiceError> {
        let key_pair = KeyPair::new(SecretKey::parse(secret_key_str).map_err(|error| {
            warn!(%error, "rejected secret key");
            error
        })?);
        let signature = key_pair.sign(
            msg.as_bytes(),
            &mut self.seeds.rng(RngPurpose::SignatureNonce),
        )?;
        debug!(verifying_key = %key_pair.verifying_key(), "signed message");

        Ok(SignatureInfo {
            signature_str: signature.to_hex(),
            verifying_key: key_pair.verifying_key().to_hex(),
        })
    }

    /// Returns true if `signature_str` is a valid signature of `msg` for the verifying key (hex or `npub` bech32).
    ///
    /// Malformed keys or signatures are reported as invalid.
    pub fn validate_schnorr(&self, msg: &str, verifying_key_str: &str, signature_str: &str) -> bool {
        let result = VerifyingKey::parse(verifying_key_str).and_then(|verifying_key| {
            let signature = Signature::from_hex(signature_str)?;
            crypto::verify_signature(&verifying_key, msg.as_bytes(), &signature)
        });
        match result {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, "signature validation failed");
                false
            }
        }
    }

    /// Signs a Nostr event authored by the secret key's verifying key.
    ///
    /// `created_at` defaults to the current time.
    pub fn sign_event(
        &self,
        secret_key_str: &str,
        kind: u16,
        tags: Vec<Vec<String>>,
        content: &str,
        created_at: Option<u64>,
    ) -> Result<Event, ServiceError> {
        let key_pair = KeyPair::new(SecretKey::parse(secret_key_str)?);
        let unsigned = match created_at {
            Some(created_at) => {
                UnsignedEvent::new(key_pair.verifying_key(), created_at, kind, tags, content)
            }
            None => UnsignedEvent::now(key_pair.verifying_key(), kind, tags, content),
        };
        let event = unsigned.sign(&key_pair, &mut self.seeds.rng(RngPurpose::SignatureNonce))?;
        debug!(id = %event.id, kind, "signed event");
        Ok(event)
    }

    /// Returns true if the JSON encoded event has a valid id and signature.
    pub fn verify_event(&self, event_json: &str) -> bool {
        match Event::from_json(event_json).and_then(|event| event.verify()) {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, "event verification failed");
                false
            }
        }
    }

    fn generate_key_pair(&self) -> KeyPair {
        KeyPair::generate(&mut self.seeds.rng(RngPurpose::KeyGeneration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nostr_signer_core::test_utils;

    // BIP-340 test vector 0.
    const VECTOR_SECRET_KEY: &str =
        "0000000000000000000000000000000000000000000000000000000000000003";
    const VECTOR_VERIFYING_KEY: &str =
        "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9";

    #[test]
    fn signing_and_validation_works() {
        let service = SignerService::new(test_utils::seed());
        let secret_key = service.generate_key();
        let message = "Hello, Nostr!";

        let info = service.schnorr_signature(message, &secret_key).unwrap();
        assert_eq!(info.verifying_key.len(), 64);
        assert_eq!(info.signature_str.len(), 128);
        assert_eq!(
            info.verifying_key,
            SecretKey::from_hex(&secret_key).unwrap().verifying_key().to_hex()
        );

        let other_key = SecretKey::from_hex(VECTOR_SECRET_KEY).unwrap().verifying_key();
        for (msg, verifying_key, signature, expected) in [
            // Valid signature should be accepted.
            (message, info.verifying_key.clone(), info.signature_str.clone(), true),
            // Bech32 verifying keys are accepted too.
            (
                message,
                VerifyingKey::from_hex(&info.verifying_key).unwrap().to_bech32(),
                info.signature_str.clone(),
                true,
            ),
            // Tampered message should be rejected.
            ("Hello, Nostr?", info.verifying_key.clone(), info.signature_str.clone(), false),
            // Wrong verifying key should be rejected.
            (message, other_key.to_hex(), info.signature_str.clone(), false),
            // Malformed verifying key should be rejected.
            (message, "xyz".to_string(), info.signature_str.clone(), false),
            // Malformed signature should be rejected.
            (message, info.verifying_key.clone(), "abcd".to_string(), false),
        ] {
            assert_eq!(
                service.validate_schnorr(msg, &verifying_key, &signature),
                expected
            );
        }
    }

    #[test]
    fn invalid_secret_keys_are_rejected() {
        let service = SignerService::default();
        for secret_key in ["", "zz", &"00".repeat(32)] {
            assert!(matches!(
                service.schnorr_signature("msg", secret_key),
                Err(ServiceError::Crypto(_))
            ));
        }
    }

    #[test]
    fn outputs_depend_only_on_the_seed() {
        let service = SignerService::default();
        let key = service.generate_key();
        let signature = service.schnorr_signature("msg", &key).unwrap();

        // Read-only operations are repeatable.
        assert_eq!(service.generate_key(), key);
        assert_eq!(service.schnorr_signature("msg", &key).unwrap(), signature);
        assert_eq!(service.generate_keypair().secret_key, key);

        // Reseeding changes generated keys and signatures.
        service.update_rng_seed(&"ab".repeat(32)).unwrap();
        let reseeded_key = service.generate_key();
        assert_ne!(reseeded_key, key);
        assert_ne!(service.schnorr_signature("msg", &key).unwrap(), signature);

        // Restoring the seed restores the outputs.
        service.update_rng_seed("").unwrap();
        assert_eq!(service.generate_key(), key);
    }

    #[test]
    fn rng_seed_reflects_updates() {
        let service = SignerService::default();
        assert_eq!(service.rng_seed(), "0".repeat(64));

        for (update, expected) in [
            // Short seeds are zero padded.
            ("ABCD".to_string(), format!("abcd{}", "0".repeat(60))),
            // Long seeds are truncated.
            ("12".repeat(40), "12".repeat(32)),
        ] {
            service.update_rng_seed(&update).unwrap();
            assert_eq!(service.rng_seed(), expected);
        }

        // Invalid hex is rejected and the seed is unchanged.
        assert!(matches!(
            service.update_rng_seed("0x12"),
            Err(ServiceError::Seed(_))
        ));
        assert_eq!(service.rng_seed(), "12".repeat(32));
    }

    #[test]
    fn greeting_works() {
        let service = SignerService::default();
        assert_eq!(service.greet("world"), "Hello, world!");
        assert_eq!(
            service.greet(VECTOR_SECRET_KEY),
            format!("Hello, {VECTOR_VERIFYING_KEY}!")
        );
    }

    #[test]
    fn event_signing_works() {
        let service = SignerService::new(test_utils::seed());
        let secret_key = service.generate_key();
        let tags = vec![vec!["t".to_string(), "nostr".to_string()]];

        let event = service
            .sign_event(&secret_key, 1, tags.clone(), "gm", Some(1_700_000_000))
            .unwrap();
        assert_eq!(event.created_at, 1_700_000_000);
        assert_eq!(event.tags, tags);
        assert_eq!(
            event.pubkey,
            SecretKey::from_hex(&secret_key).unwrap().verifying_key()
        );

        let json = event.as_json().unwrap();
        assert!(service.verify_event(&json));
        assert!(!service.verify_event(&json.replace("\"gm\"", "\"gn\"")));
        assert!(!service.verify_event("{}"));
    }
}
