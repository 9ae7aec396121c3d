//! Initialization and finalization for Argon2.
//!
//! This module handles the boundary operations of the Argon2 algorithm:
//! computing the initial hash H0 from all inputs, deriving the first two
//! blocks of every lane from it, and deriving the final tag from the
//! filled memory.

use zeroize::Zeroize;

use super::block::{BLOCK_SIZE, Block};
use super::context::Context;
use super::error::Error;
use super::memory::MemoryLayout;
use super::params::{Variant, ZeroizePolicy};
use crate::hash::{BLAKE2B_OUTBYTES, blake2b, blake2b_long};

/// Length of H0 extended with the two 32-bit words used to derive the
/// first blocks of a lane.
pub(crate) const PREHASH_SEED_LENGTH: usize = BLAKE2B_OUTBYTES + 8;

/// Computes the initial hash H0 from all Argon2 inputs.
///
/// H0 is a 64-byte BLAKE2b hash of the concatenation of all parameters
/// and inputs, each variable-length input prefixed with its length
/// (RFC 9106 §3.2):
///
/// ```text
/// H0 = BLAKE2b(p || T || m || t || v || y || |P| || P || |S| || S || |K| || K || |X| || X)
/// ```
///
/// `m` is the memory cost as requested, before alignment. The result is
/// written into the first 64 bytes of the returned seed; the trailing
/// 8 bytes are zero.
///
/// Once absorbed, the password and secret are wiped (and their declared
/// lengths zeroed) if the context flags request it.
pub(crate) fn initial_hash(
    context: &mut Context<'_>,
    variant: Variant,
) -> Result<[u8; PREHASH_SEED_LENGTH], Error> {
    let lanes = context.lanes.to_le_bytes();
    let out_len = context.out_len.to_le_bytes();
    let m_cost = context.m_cost.to_le_bytes();
    let t_cost = context.t_cost.to_le_bytes();
    let version = context.version.as_u32().to_le_bytes();
    let tag = variant.tag().to_le_bytes();
    let pwd_len = context.pwd_len.to_le_bytes();
    let salt_len = context.salt_len.to_le_bytes();
    let secret_len = context.secret_len.to_le_bytes();
    let ad_len = context.ad_len.to_le_bytes();

    let mut seed = [0u8; PREHASH_SEED_LENGTH];
    blake2b(
        &mut seed[..BLAKE2B_OUTBYTES],
        &[
            lanes.as_slice(),
            out_len.as_slice(),
            m_cost.as_slice(),
            t_cost.as_slice(),
            version.as_slice(),
            tag.as_slice(),
            pwd_len.as_slice(),
            context.pwd.as_deref().unwrap_or_default(),
            salt_len.as_slice(),
            context.salt.unwrap_or_default(),
            secret_len.as_slice(),
            context.secret.as_deref().unwrap_or_default(),
            ad_len.as_slice(),
            context.ad.unwrap_or_default(),
        ],
    )?;

    if context.flags.clear_password {
        if let Some(pwd) = context.pwd.as_deref_mut() {
            pwd.zeroize();
            context.pwd_len = 0;
        }
    }

    if context.flags.clear_secret {
        if let Some(secret) = context.secret.as_deref_mut() {
            secret.zeroize();
            context.secret_len = 0;
        }
    }

    Ok(seed)
}

/// Initializes the first two blocks of every lane:
///
/// ```text
/// B[lane][0] = H'^(1024)(H0 || LE32(0) || LE32(lane))
/// B[lane][1] = H'^(1024)(H0 || LE32(1) || LE32(lane))
/// ```
///
/// The trailing 8 bytes of `seed` are overwritten in the process.
pub(crate) fn fill_first_blocks(
    seed: &mut [u8; PREHASH_SEED_LENGTH],
    layout: &MemoryLayout,
    blocks: &mut [Block],
    policy: ZeroizePolicy,
) -> Result<(), Error> {
    let mut bytes = [0u8; BLOCK_SIZE];
    let result = derive_first_blocks(seed, layout, blocks, &mut bytes);

    if policy.wipes() {
        bytes.zeroize();
    }

    result
}

fn derive_first_blocks(
    seed: &mut [u8; PREHASH_SEED_LENGTH],
    layout: &MemoryLayout,
    blocks: &mut [Block],
    bytes: &mut [u8; BLOCK_SIZE],
) -> Result<(), Error> {
    for lane in 0..layout.lanes {
        seed[BLAKE2B_OUTBYTES + 4..].copy_from_slice(&lane.to_le_bytes());

        for column in 0..2u32 {
            seed[BLAKE2B_OUTBYTES..BLAKE2B_OUTBYTES + 4].copy_from_slice(&column.to_le_bytes());

            blake2b_long(bytes, &[seed.as_slice()])?;
            blocks[layout.index(lane, column)] = Block::from_bytes(bytes);
        }
    }

    Ok(())
}

/// Finalizes the Argon2 computation to produce the output tag.
///
/// The finalization XORs together the last block of each lane (forming
/// a single 1024-byte block), then applies the variable-length hash
/// function H' to produce a tag of `out.len()` bytes.
///
/// This construction ensures that all lanes contribute to the final
/// output, preventing attackers from skipping lane computations.
pub(crate) fn finalize(
    blocks: &[Block],
    layout: &MemoryLayout,
    out: &mut [u8],
    policy: ZeroizePolicy,
) -> Result<(), Error> {
    let mut final_block = Block::ZERO;

    for lane in 0..layout.lanes {
        final_block.in_place_xor(&blocks[layout.index(lane, layout.lane_len - 1)]);
    }

    let mut bytes = final_block.to_bytes();
    let result = blake2b_long(out, &[bytes.as_slice()]).map_err(Error::from);

    if policy.wipes() {
        final_block.zeroize();
        bytes.zeroize();
    }

    result
}
