//! Memory-hard password hashing.
//!
//! This crate implements the Argon2 family of password hashing functions
//! (Argon2d, Argon2i and Argon2id, versions 0x10 and 0x13) as specified in
//! RFC 9106, together with the PHC string format used to store and verify
//! password hashes.
//!
//! The focus is on **clarity, predictability, and auditability**. Every
//! input is checked against fixed limits before any memory is touched,
//! every failure maps to a stable numeric code, and all internal buffers
//! are wiped before release unless the caller opts out.
//!
//! # Module overview
//!
//! - `hash`
//!   BLAKE2b and the variable-length H' construction Argon2 is built on.
//!
//! - `derivation`
//!   The Argon2 key derivation functions: parameter validation, memory
//!   filling (optionally multi-threaded), finalization, and the encoded
//!   hash format.
//!
//! # Example
//!
//! ```rust, ignore
//! use argon2_core::derivation::argon2::{Params, Variant, hash_encoded, verify};
//!
//! let params = Params::new(65536, 2, 1, 32);
//! let encoded = hash_encoded(b"password", b"somesalt", &params, Variant::Argon2id).unwrap();
//!
//! assert!(verify(&encoded, b"password", Variant::Argon2id).is_ok());
//! ```

pub mod derivation;
pub mod hash;
