//! Hash functions consumed by the key-derivation code.
//!
//! Currently includes BLAKE2b and its variable-length extension H'.

pub mod blake2b_long;

/// Re-export of the BLAKE2b helpers.
pub use blake2b_long::{BLAKE2B_OUTBYTES, LongHashError, blake2b, blake2b_long};
