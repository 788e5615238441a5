//! Accelera Common Library
//!
//! Shared types, constants, and utilities for the Accelera protocol core.
//!
//! - **Fixed-point decimals** (`Dnum`): 256-bit mantissa plus decimal
//!   scale, exact for addition, subtraction and comparison
//! - **Snapshots**: stake and per-rate debt records read from the chain
//!   or the indexer
//! - **Errors**: one typed error enum with stable codes
//! - **Fingerprints**: canonical memoization keys for input snapshots
//!
//! Nothing in this workspace performs I/O: every function is a pure
//! computation over a fully-resolved snapshot.

pub mod constants;
pub mod dnum;
pub mod errors;
pub mod fingerprint;
pub mod types;

// Re-exports for convenience
pub use dnum::Dnum;
pub use errors::*;
pub use fingerprint::*;
pub use types::*;

pub use ethnum::I256;
