//! Utilities for Nostr signers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the unix timestamp in seconds.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}

/// Returns the number of leading zero bits in `bytes`.
pub fn leading_zero_bits(bytes: &[u8]) -> u32 {
    let mut count = 0;
    for byte in bytes {
        count += byte.leading_zeros();
        if *byte != 0 {
            break;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_zero_bits_works() {
        for (bytes, expected) in [
            (&[0xff, 0x00][..], 0),
            (&[0x00, 0x0f][..], 12),
            (&[0x00, 0x00, 0x01][..], 23),
            (&[0x00, 0x00][..], 16),
            (&[][..], 0),
        ] {
            assert_eq!(leading_zero_bits(bytes), expected);
        }
    }
}
