//! Process-wide seed state.

use nostr_signer_core::{RngPurpose, RngSeed, SeedError, SeededRng};
use parking_lot::RwLock;

/// Holds the seed of the service's random generators.
///
/// Readers copy the seed under a shared lock, [`SeedStore::update_from_hex`] is the only writer.
#[derive(Debug, Default)]
pub struct SeedStore {
    seed: RwLock<RngSeed>,
}

impl SeedStore {
    /// Initializes a store holding `seed`.
    pub fn new(seed: RngSeed) -> Self {
        Self {
            seed: RwLock::new(seed),
        }
    }

    /// Returns the current seed as lowercase hex.
    pub fn to_hex(&self) -> String {
        self.seed.read().to_hex()
    }

    /// Replaces the seed with hex encoded seed material (zero padded or truncated to 32 bytes).
    ///
    /// Invalid hex leaves the current seed in place.
    pub fn update_from_hex(&self, hex_str: &str) -> Result<(), SeedError> {
        self.seed.write().assign_hex(hex_str)
    }

    /// Returns a generator for `purpose` seeded with the current seed.
    pub fn rng(&self, purpose: RngPurpose) -> SeededRng {
        self.seed.read().rng(purpose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn seed_store_updates_work() {
        let store = SeedStore::default();
        assert_eq!(store.to_hex(), "0".repeat(64));

        store.update_from_hex("0102").unwrap();
        assert_eq!(store.to_hex(), format!("0102{}", "0".repeat(60)));

        // Rejected updates keep the previous seed.
        assert_eq!(store.update_from_hex("not hex"), Err(SeedError::InvalidHex));
        assert_eq!(store.to_hex(), format!("0102{}", "0".repeat(60)));
    }

    #[test]
    fn concurrent_readers_see_complete_seeds() {
        let store = Arc::new(SeedStore::default());
        let seeds = ["11".repeat(32), "22".repeat(32)];

        let writer = {
            let store = Arc::clone(&store);
            let seeds = seeds.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    store.update_from_hex(&seeds[i % 2]).unwrap();
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let seeds = seeds.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        let current = store.to_hex();
                        assert!(current == "0".repeat(64) || seeds.contains(&current));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
