//! # Fingerprint Module
//!
//! Canonical encoding and fingerprints for configurations.
//!
//! Derivation is referentially transparent, so any result can be cached under
//! the fingerprint of the effective configuration it was computed from.
//!
//! Format: Header (5 bytes) + postcard-serialized configuration.
//! - 4 bytes: Magic ("TOMC")
//! - 1 byte: Version
//!
//! Maps are `BTreeMap`, so the encoding of equal configurations is
//! bit-identical.

use crate::primitives::{FORMAT_VERSION, MAGIC_BYTES};
use crate::resolver::merge_preset_profile;
use crate::types::{TomConfig, TomError};

/// Encode a configuration to canonical bytes (header + payload).
///
/// This is a pure transformation - no file I/O.
pub fn canonical_bytes(config: &TomConfig) -> Result<Vec<u8>, TomError> {
    let payload =
        postcard::to_stdvec(config).map_err(|e| TomError::SerializationError(e.to_string()))?;

    let mut bytes = Vec::with_capacity(MAGIC_BYTES.len() + 1 + payload.len());
    bytes.extend_from_slice(MAGIC_BYTES);
    bytes.push(FORMAT_VERSION);
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// 64-bit FNV-1a over canonical bytes.
///
/// This checksum is designed for:
/// - Cache keys for effective configurations
/// - Quick equality checks between deployments
///
/// It is **NOT** collision resistant. Use [`canonical_crypto_hash`] where
/// that matters.
#[must_use]
pub fn checksum_bytes(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}

/// Checksum of a configuration exactly as given.
pub fn config_checksum(config: &TomConfig) -> Result<u64, TomError> {
    canonical_bytes(config).map(|bytes| checksum_bytes(&bytes))
}

/// Checksum of the effective (preset-merged) configuration.
///
/// Two stored configurations that resolve to the same effective phases under
/// the same preset share this value.
pub fn effective_checksum(config: &TomConfig) -> Result<u64, TomError> {
    config_checksum(&merge_preset_profile(config))
}

/// BLAKE3 hash of the canonical encoding, as a 64-character hex string.
///
/// # Requires
///
/// This function is only available with the `crypto-hash` feature enabled.
#[cfg(feature = "crypto-hash")]
pub fn canonical_crypto_hash(config: &TomConfig) -> Result<String, TomError> {
    let bytes = canonical_bytes(config)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

// =============================================================================
// TESTS
// =============================================================================
