//! Input Fingerprints
//!
//! The core is stateless, so callers that want to memoize an expensive
//! recomputation (e.g. the rate chart) need a canonical key for the
//! inputs. The fingerprint is SHA-256 over the borsh encoding, which is
//! deterministic for every type in this workspace.

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};

/// 32-byte canonical digest of a value
pub type Fingerprint = [u8; 32];

/// Computes the fingerprint of any borsh-serializable input snapshot
pub fn input_fingerprint<T: BorshSerialize + ?Sized>(input: &T) -> Fingerprint {
    let encoded = borsh::to_vec(input).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    let result = hasher.finalize();
    let mut fingerprint = [0u8; 32];
    fingerprint.copy_from_slice(&result);
    fingerprint
}
