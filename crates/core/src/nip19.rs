//! Bech32 encodings for Nostr keys and ids.
//!
//! Ref: <https://github.com/nostr-protocol/nips/blob/master/19.md>.

use bech32::{Bech32, Hrp};

use crate::errors::CryptoError;

/// Human-readable prefix for secret keys.
pub const PREFIX_SECRET_KEY: &str = "nsec";
/// Human-readable prefix for public keys.
pub const PREFIX_PUBLIC_KEY: &str = "npub";
/// Human-readable prefix for event ids.
pub const PREFIX_NOTE_ID: &str = "note";

/// Encodes `data` as bech32 with the given human-readable prefix.
pub(crate) fn encode(prefix: &'static str, data: &[u8]) -> String {
    bech32::encode::<Bech32>(Hrp::parse_unchecked(prefix), data)
        .expect("32 byte payloads are well within the bech32 length limit")
}

/// Decodes a bech32 string, checking its human-readable prefix.
pub(crate) fn decode(expected_prefix: &'static str, bech32_str: &str) -> Result<Vec<u8>, CryptoError> {
    let (hrp, data) =
        bech32::decode(bech32_str.trim()).map_err(|_| CryptoError::InvalidEncoding)?;
    if hrp != Hrp::parse_unchecked(expected_prefix) {
        return Err(CryptoError::WrongBech32Prefix {
            expected: expected_prefix,
        });
    }
    Ok(data)
}
