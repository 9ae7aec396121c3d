//! Memory organization for Argon2.
//!
//! Memory is organized as a matrix of lanes (rows) and columns, with each
//! cell containing a 1024-byte block. Lanes are split into four slices, and
//! the portion of a lane inside one slice is a segment. Lanes can be
//! processed independently within each slice, enabling parallelism.
//!
//! The [`Arena`] owns the blocks for the lifetime of one computation and
//! wipes them, according to its [`ZeroizePolicy`], before handing them back
//! to the allocator.

use std::sync::Arc;

use zeroize::Zeroize;

use super::block::{BLOCK_SIZE, Block};
use super::error::Error;
use super::params::{SYNC_POINTS, ZeroizePolicy};

/// Custom allocation hook.
///
/// Receives the arena size in bytes and returns the blocks backing it, or
/// `None` when the memory cannot be provided. The returned vector must hold
/// exactly `bytes / 1024` blocks.
pub type AllocateFn = Arc<dyn Fn(usize) -> Option<Vec<Block>> + Send + Sync>;

/// Custom release hook, paired with [`AllocateFn`].
///
/// Receives the (already wiped, unless the policy retains memory) blocks
/// and the arena size in bytes.
pub type DeallocateFn = Arc<dyn Fn(Vec<Block>, usize) + Send + Sync>;

/// Memory layout parameters for Argon2.
///
/// The memory is organized as follows:
/// - Total memory is divided into `lanes` independent rows.
/// - Each lane contains `lane_len` blocks.
/// - Each lane is divided into 4 slices (sync points).
/// - Each slice contains `segment_len` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLayout {
    pub lanes: u32,
    pub lane_len: u32,
    pub segment_len: u32,
    pub total_blocks: u32,
}

impl MemoryLayout {
    /// Derives the layout for a requested memory cost (in KiB, i.e. blocks)
    /// and lane count.
    ///
    /// The block count is raised to at least `8 × lanes` and then rounded
    /// down to a multiple of `4 × lanes` so that every segment has the same
    /// length. `lanes` must be non-zero.
    pub fn new(m_cost: u32, lanes: u32) -> Self {
        let min_blocks = 2 * SYNC_POINTS * lanes;
        let memory_blocks = m_cost.max(min_blocks);

        let segment_len = memory_blocks / (lanes * SYNC_POINTS);
        let lane_len = segment_len * SYNC_POINTS;

        Self {
            lanes,
            lane_len,
            segment_len,
            total_blocks: segment_len * lanes * SYNC_POINTS,
        }
    }

    #[inline]
    pub fn index(&self, lane: u32, index_in_lane: u32) -> usize {
        lane as usize * self.lane_len as usize + index_in_lane as usize
    }

    /// Position of the segment `(lane, slice)` in segment order.
    #[inline]
    pub(crate) fn segment(&self, lane: u32, slice: u32) -> usize {
        (lane * SYNC_POINTS + slice) as usize
    }

    /// Arena size in bytes, or `None` if it overflows `usize`.
    pub fn byte_len(&self) -> Option<usize> {
        (self.total_blocks as usize).checked_mul(BLOCK_SIZE)
    }
}

/// Owned block storage for one Argon2 computation.
pub(crate) struct Arena {
    blocks: Vec<Block>,
    bytes: usize,
    deallocate: Option<DeallocateFn>,
    policy: ZeroizePolicy,
}

impl Arena {
    /// Allocates `layout.total_blocks` blocks through the custom allocator
    /// if one is given, otherwise through the global allocator.
    pub(crate) fn allocate(
        layout: &MemoryLayout,
        allocate: Option<&AllocateFn>,
        deallocate: Option<DeallocateFn>,
        policy: ZeroizePolicy,
    ) -> Result<Self, Error> {
        let count = layout.total_blocks as usize;
        let bytes = layout.byte_len().ok_or(Error::MemoryAllocationError)?;

        let blocks = match allocate {
            Some(allocate) => {
                let blocks = allocate(bytes).ok_or(Error::MemoryAllocationError)?;
                if blocks.len() != count {
                    if let Some(deallocate) = deallocate.as_ref() {
                        deallocate(blocks, bytes);
                    }
                    return Err(Error::MemoryAllocationError);
                }
                blocks
            }
            None => {
                let mut blocks = Vec::new();
                blocks
                    .try_reserve_exact(count)
                    .map_err(|_| Error::MemoryAllocationError)?;
                blocks.resize(count, Block::ZERO);
                blocks
            }
        };

        Ok(Self {
            blocks,
            bytes,
            deallocate,
            policy,
        })
    }

    #[inline]
    pub(crate) fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[inline]
    pub(crate) fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        if self.policy.wipes() {
            self.blocks.iter_mut().for_each(Zeroize::zeroize);
        }

        let blocks = std::mem::take(&mut self.blocks);
        if let Some(deallocate) = self.deallocate.take() {
            deallocate(blocks, self.bytes);
        }
    }
}
