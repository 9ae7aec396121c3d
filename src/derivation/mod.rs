//! Key derivation functions.
//!
//! Currently includes the Argon2 family (Argon2d, Argon2i, Argon2id).

pub mod argon2;

/// Re-export of the Argon2id convenience function.
pub use argon2::argon2id;
