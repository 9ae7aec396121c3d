//! Reference block position computation for Argon2.
//!
//! When filling a block at position (lane, index), Argon2 needs to select
//! a reference block to mix with the previous block. The selection algorithm
//! uses a pseudo-random 64-bit value to determine which block to reference,
//! with constraints to ensure the referenced block has already been computed.

use super::memory::MemoryLayout;
use super::params::{SYNC_POINTS, Variant};

/// The block currently being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    pub pass: u32,
    pub lane: u32,
    pub slice: u32,
    pub index: u32,
}

/// Where the pseudo-random value for a block comes from.
///
/// Resolved once from the [`Variant`] when an instance is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Addressing {
    /// Always from the previous block (Argon2d).
    DataDependent,
    /// Always from the address generator (Argon2i).
    DataIndependent,
    /// From the address generator during the first two slices of the first
    /// pass, from the previous block afterwards (Argon2id).
    Hybrid,
}

impl Addressing {
    pub(crate) fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Argon2d => Addressing::DataDependent,
            Variant::Argon2i => Addressing::DataIndependent,
            Variant::Argon2id => Addressing::Hybrid,
        }
    }

    #[inline]
    pub(crate) fn data_independent(self, pass: u32, slice: u32) -> bool {
        match self {
            Addressing::DataDependent => false,
            Addressing::DataIndependent => true,
            Addressing::Hybrid => pass == 0 && slice < SYNC_POINTS / 2,
        }
    }
}

/// Lane the reference block is taken from.
///
/// The first slice of the first pass can only reference its own lane; all
/// other positions pick a lane from the high 32 bits of the pseudo-random
/// value.
#[inline]
pub(crate) fn reference_lane(layout: &MemoryLayout, position: &Position, pseudo_rand: u64) -> u32 {
    if position.pass == 0 && position.slice == 0 {
        position.lane
    } else {
        ((pseudo_rand >> 32) % layout.lanes as u64) as u32
    }
}

/// Computes the position of the reference block inside its lane.
///
/// The reference area depends on the pass, the slice and whether the
/// reference lies in the current lane (RFC 9106 §3.4.1.3):
///
/// - First pass, first slice: all blocks already produced in this lane,
///   except the previous one.
/// - First pass, later slices: all finished slices, plus the blocks already
///   produced in this segment when the lane is the current one.
/// - Later passes: the three most recently finished slices, plus the blocks
///   already produced in this segment when the lane is the current one.
///
/// For another lane, the block at index 0 of the segment must not reference
/// the last block of the previous slice, so the area shrinks by one.
///
/// The mapping from `pseudo_rand` (the low 32 bits of the pseudo-random
/// value) into the area is non-uniform and biased toward recently computed
/// blocks.
pub(crate) fn index_alpha(
    layout: &MemoryLayout,
    position: &Position,
    pseudo_rand: u32,
    same_lane: bool,
) -> u32 {
    let segment_len = layout.segment_len;
    let lane_len = layout.lane_len;
    let index = position.index;

    let reference_area_size = if position.pass == 0 {
        if position.slice == 0 {
            index - 1
        } else if same_lane {
            position.slice * segment_len + index - 1
        } else if index == 0 {
            position.slice * segment_len - 1
        } else {
            position.slice * segment_len
        }
    } else if same_lane {
        lane_len - segment_len + index - 1
    } else if index == 0 {
        lane_len - segment_len - 1
    } else {
        lane_len - segment_len
    };

    // x = J1² / 2³², relative = W - 1 - (W × x / 2³²)
    let area = reference_area_size as u64;
    let j1 = pseudo_rand as u64;
    let x = (j1 * j1) >> 32;
    let relative_position = area - 1 - ((area * x) >> 32);

    let start_position = if position.pass == 0 || position.slice == SYNC_POINTS - 1 {
        0
    } else {
        (position.slice + 1) * segment_len
    };

    ((start_position as u64 + relative_position) % lane_len as u64) as u32
}
