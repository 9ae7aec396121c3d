//! Argon2 password hashing function (RFC 9106).
//!
//! Argon2 is a memory-hard password hashing function designed to resist
//! GPU-based brute-force attacks. Three variants share one core and differ
//! only in how reference blocks are addressed:
//!
//! - **Argon2d**: data-dependent addressing. Highest resistance to
//!   time-memory trade-offs, but leaks access patterns.
//! - **Argon2i**: data-independent addressing, resisting side-channel
//!   attacks.
//! - **Argon2id**: data-independent for the first half of the first pass,
//!   data-dependent afterwards.
//!
//! # Algorithm Overview
//!
//! 1. **Initialization**: Compute H0 = BLAKE2b(params || password || salt || ...)
//! 2. **Lane initialization**: Generate the first two blocks of each lane
//!    using H' (variable-length BLAKE2b).
//! 3. **Memory filling**: Fill the remaining blocks using the compression
//!    function G, which is based on the BLAKE2b round function with
//!    additional multiplication for diffusion.
//! 4. **Finalization**: XOR the last block of each lane together and apply
//!    H' to produce the final tag.
//!
//! # Memory Organization
//!
//! Memory is organized as a matrix of 1024-byte blocks:
//! - **Lanes**: independent rows that can be processed in parallel.
//! - **Slices**: each lane is divided into 4 slices (sync points).
//! - **Segments**: blocks of one lane within a slice.
//!
//! # Entry points
//!
//! - [`hash`], [`argon2d`], [`argon2i`], [`argon2id`]: raw tag from a
//!   password, a salt and [`Params`].
//! - [`hash_encoded`] / [`verify`]: PHC-formatted hashes.
//! - [`argon2_ctx`] / [`verify_ctx`]: full control through a [`Context`]
//!   (secret, associated data, thread count, wipe flags, custom allocator).

pub(crate) mod block;
pub(crate) mod boundary;
pub mod context;
pub mod core;
pub mod encoding;
pub mod error;
pub(crate) mod memory;
pub mod params;
pub(crate) mod reference;
pub(crate) mod schedule;
pub(crate) mod segment;

pub use block::{BLOCK_SIZE, Block};
pub use context::{Context, validate_inputs};
pub use self::core::{argon2_ctx, argon2d, argon2i, argon2id, hash, hash_encoded, verify, verify_ctx};
pub use encoding::{EncodedHash, encoded_len};
pub use error::{Error, error_message};
pub use memory::{AllocateFn, DeallocateFn, MemoryLayout};
pub use params::{Flags, Params, Variant, Version, ZeroizePolicy};
