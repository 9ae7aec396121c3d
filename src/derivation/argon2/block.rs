//! Block operations for Argon2.
//!
//! This module defines the fundamental 1024-byte block structure and the
//! compression function G that forms the core of the Argon2 algorithm.
//! The compression function is based on the BLAKE2b round function but
//! uses additional multiplication operations for enhanced diffusion.

use zeroize::Zeroize;

/// Size of a memory block in bytes.
pub const BLOCK_SIZE: usize = 1024;

/// Number of 64-bit words in a block.
pub const QWORDS_IN_BLOCK: usize = BLOCK_SIZE / 8;

/// Number of pseudo-random addresses produced by one address block.
pub(crate) const ADDRESSES_IN_BLOCK: u32 = 128;

/// A 1024-byte memory block (128 × 64-bit words).
///
/// Blocks are the fundamental unit of memory in Argon2. The algorithm
/// operates by filling and mixing these blocks using the compression
/// function G. Blocks are not wiped on drop; the arena that owns them
/// wipes them according to its zeroize policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block(pub(crate) [u64; QWORDS_IN_BLOCK]);

impl Block {
    pub const ZERO: Self = Self([0u64; QWORDS_IN_BLOCK]);

    pub fn is_zero(&self) -> bool {
        self.0.iter().fold(0u64, |acc, w| acc | w) == 0
    }

    pub(crate) fn copy_from(&mut self, other: &Block) {
        self.0.copy_from_slice(&other.0);
    }

    pub(crate) fn in_place_xor(&mut self, other: &Block) {
        self.0
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(a, b)| *a ^= b);
    }

    pub(crate) fn from_bytes(bytes: &[u8; BLOCK_SIZE]) -> Self {
        let mut words = [0u64; QWORDS_IN_BLOCK];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut le = [0u8; 8];
            le.copy_from_slice(chunk);
            *word = u64::from_le_bytes(le);
        }
        Block(words)
    }

    pub(crate) fn to_bytes(&self) -> [u8; BLOCK_SIZE] {
        let mut out = [0u8; BLOCK_SIZE];
        for (chunk, word) in out.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// Compression function G (RFC 9106 §3.5).
    ///
    /// Computes G(X, Y) = P(P(X ⊕ Y)) ⊕ X ⊕ Y, where P is a permutation
    /// based on the BLAKE2b round function. The permutation is applied
    /// twice: first on rows of 16 words, then on columns.
    ///
    /// This function provides the mixing that gives Argon2 its security
    /// properties. The XOR at the end ensures that information from both
    /// input blocks propagates to the output.
    pub(crate) fn compress(x: &Self, y: &Self) -> Self {
        let mut r = Block::ZERO;
        for i in 0..QWORDS_IN_BLOCK {
            r.0[i] = x.0[i] ^ y.0[i];
        }

        let mut z = r.clone();

        // Rows: P on 8 groups of 16 consecutive words
        for row in z.0.chunks_exact_mut(16) {
            let mut v = [0u64; 16];
            v.copy_from_slice(row);
            permute_p(&mut v);
            row.copy_from_slice(&v);
        }

        // Columns: P on 8 groups of interleaved word pairs
        for i in 0..8 {
            let mut v = [0u64; 16];
            for (k, pair) in v.chunks_exact_mut(2).enumerate() {
                let base = 2 * i + 16 * k;
                pair[0] = z.0[base];
                pair[1] = z.0[base + 1];
            }

            permute_p(&mut v);

            for (k, pair) in v.chunks_exact(2).enumerate() {
                let base = 2 * i + 16 * k;
                z.0[base] = pair[0];
                z.0[base + 1] = pair[1];
            }
        }

        z.in_place_xor(&r);
        r.zeroize();

        z
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Zeroize for Block {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Counter block used to derive data-independent reference addresses.
///
/// The input block Z holds the current position, the instance shape and a
/// counter. Each refresh increments the counter and recomputes the address
/// block as G(0, G(0, Z)), yielding 128 pseudo-random 64-bit values.
pub(crate) struct AddressGenerator {
    input: Block,
    addresses: Block,
}

impl AddressGenerator {
    pub(crate) fn new(
        pass: u32,
        lane: u32,
        slice: u32,
        memory_blocks: u32,
        passes: u32,
        variant_tag: u32,
    ) -> Self {
        let mut input = Block::ZERO;
        input.0[0] = pass as u64;
        input.0[1] = lane as u64;
        input.0[2] = slice as u64;
        input.0[3] = memory_blocks as u64;
        input.0[4] = passes as u64;
        input.0[5] = variant_tag as u64;

        Self {
            input,
            addresses: Block::ZERO,
        }
    }

    /// Advances the counter and regenerates the address block.
    pub(crate) fn refresh(&mut self) {
        self.input.0[6] = self.input.0[6].wrapping_add(1);
        let tmp = Block::compress(&Block::ZERO, &self.input);
        self.addresses = Block::compress(&Block::ZERO, &tmp);
    }

    #[inline]
    pub(crate) fn address(&self, index_in_segment: u32) -> u64 {
        self.addresses.0[(index_in_segment % ADDRESSES_IN_BLOCK) as usize]
    }
}

/// GB mixing function (Argon2 variant of BLAKE2b's G).
///
/// Unlike the original BLAKE2b G function which adds message words,
/// Argon2's GB function uses multiplication of the lower 32 bits to
/// achieve better diffusion. The formula for each step is:
///
/// ```text
/// a = a + b + 2 × trunc(a) × trunc(b)
/// d = (d ⊕ a) >>> rotation
/// ```
///
/// where trunc() extracts the lower 32 bits. The rotation amounts are
/// 32, 24, 16, and 63 bits respectively.
#[inline(always)]
fn gb(a: u64, b: u64, c: u64, d: u64) -> (u64, u64, u64, u64) {
    let a = fblamka(a, b);
    let d = (d ^ a).rotate_right(32);

    let c = fblamka(c, d);
    let b = (b ^ c).rotate_right(24);

    let a = fblamka(a, b);
    let d = (d ^ a).rotate_right(16);

    let c = fblamka(c, d);
    let b = (b ^ c).rotate_right(63);

    (a, b, c, d)
}

#[inline(always)]
fn fblamka(x: u64, y: u64) -> u64 {
    let xy = (x & 0xFFFF_FFFF).wrapping_mul(y & 0xFFFF_FFFF);
    x.wrapping_add(y).wrapping_add(xy.wrapping_mul(2))
}

/// P permutation: one round of the BLAKE2-like mixing.
///
/// Applies GB to a 4×4 matrix of 64-bit words, first along columns,
/// then along diagonals.
#[inline(always)]
fn permute_p(v: &mut [u64; 16]) {
    (v[0], v[4], v[8], v[12]) = gb(v[0], v[4], v[8], v[12]);
    (v[1], v[5], v[9], v[13]) = gb(v[1], v[5], v[9], v[13]);
    (v[2], v[6], v[10], v[14]) = gb(v[2], v[6], v[10], v[14]);
    (v[3], v[7], v[11], v[15]) = gb(v[3], v[7], v[11], v[15]);

    (v[0], v[5], v[10], v[15]) = gb(v[0], v[5], v[10], v[15]);
    (v[1], v[6], v[11], v[12]) = gb(v[1], v[6], v[11], v[12]);
    (v[2], v[7], v[8], v[13]) = gb(v[2], v[7], v[8], v[13]);
    (v[3], v[4], v[9], v[14]) = gb(v[3], v[4], v[9], v[14]);
}
