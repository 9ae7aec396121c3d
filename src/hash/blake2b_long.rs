//! Variable-length BLAKE2b (H') as used by Argon2.
//!
//! Argon2 needs digests longer than the 64 bytes BLAKE2b can emit directly:
//! the first blocks of each lane are 1024 bytes, and the final tag can be
//! any length up to `u32::MAX`. H' (RFC 9106 §3.3) builds such outputs by
//! chaining BLAKE2b-512 invocations and keeping the first half of each.
//!
//! The BLAKE2b compression itself comes from the `blake2` crate.

use blake2::Blake2bVar;
use blake2::digest::{Update, VariableOutput};
use zeroize::Zeroize;

/// Largest digest BLAKE2b produces in a single invocation.
pub const BLAKE2B_OUTBYTES: usize = 64;

/// Errors raised by the hash collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongHashError {
    /// The requested output length is zero or does not fit in 32 bits.
    InvalidOutputLength,
}

/// Computes BLAKE2b with a digest length of `out.len()` over the
/// concatenation of `inputs`.
///
/// `out` must be between 1 and 64 bytes long.
pub fn blake2b(out: &mut [u8], inputs: &[&[u8]]) -> Result<(), LongHashError> {
    let mut state =
        Blake2bVar::new(out.len()).map_err(|_| LongHashError::InvalidOutputLength)?;

    for input in inputs {
        state.update(input);
    }

    state
        .finalize_variable(out)
        .map_err(|_| LongHashError::InvalidOutputLength)
}

/// Computes H'(inputs) with an output length of `out.len()` bytes.
///
/// The output length is prepended as a 32-bit little-endian integer. For
/// outputs of at most 64 bytes this is a single BLAKE2b call; longer outputs
/// are produced as `V1[..32] || V2[..32] || ... || Vr` where each `Vi` is the
/// BLAKE2b-512 digest of `V(i-1)` and the final `Vr` is truncated to the
/// remaining length.
pub fn blake2b_long(out: &mut [u8], inputs: &[&[u8]]) -> Result<(), LongHashError> {
    let out_len = u32::try_from(out.len()).map_err(|_| LongHashError::InvalidOutputLength)?;
    let prefix = out_len.to_le_bytes();

    let mut prefixed: Vec<&[u8]> = Vec::with_capacity(inputs.len() + 1);
    prefixed.push(&prefix);
    prefixed.extend_from_slice(inputs);

    if out.len() <= BLAKE2B_OUTBYTES {
        return blake2b(out, &prefixed);
    }

    let mut v = [0u8; BLAKE2B_OUTBYTES];
    blake2b(&mut v, &prefixed)?;

    let half = BLAKE2B_OUTBYTES / 2;
    out[..half].copy_from_slice(&v[..half]);
    let mut written = half;

    while out.len() - written > BLAKE2B_OUTBYTES {
        let previous = v;
        blake2b(&mut v, &[previous.as_slice()])?;
        out[written..written + half].copy_from_slice(&v[..half]);
        written += half;
    }

    let previous = v;
    let result = blake2b(&mut out[written..], &[previous.as_slice()]);

    v.zeroize();

    result
}
