//! Segment filling for Argon2.
//!
//! A segment is the part of one lane that lies inside one slice. While a
//! slice is being filled, the segments of that slice are the only blocks
//! written; every other segment is read-only. [`SegmentView`] captures
//! exactly that split so each worker holds its own segment mutably and
//! shares read access to the finished ones.

use super::block::{ADDRESSES_IN_BLOCK, AddressGenerator, Block};
use super::memory::MemoryLayout;
use super::params::{SYNC_POINTS, Version};
use super::reference::{Addressing, Position, index_alpha, reference_lane};

/// Fixed per-instance values needed to fill any segment.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InstanceShape {
    pub layout: MemoryLayout,
    pub passes: u32,
    pub version: Version,
    pub variant_tag: u32,
    pub addressing: Addressing,
}

/// Read-only access to every segment outside the slice being filled.
///
/// Indexed in segment order (`lane * 4 + slice`). Entries belonging to the
/// slice being filled are empty.
pub(crate) struct SegmentView<'a> {
    segments: Vec<&'a [Block]>,
    slice: u32,
}

impl<'a> SegmentView<'a> {
    /// Splits `blocks` for filling `slice`.
    ///
    /// Returns the shared view and, in lane order, the mutable segments of
    /// `slice`.
    pub(crate) fn split(
        blocks: &'a mut [Block],
        layout: &MemoryLayout,
        slice: u32,
    ) -> (Self, Vec<&'a mut [Block]>) {
        let segment_len = layout.segment_len as usize;
        let mut segments: Vec<&'a [Block]> =
            Vec::with_capacity((layout.lanes * SYNC_POINTS) as usize);
        let mut writable = Vec::with_capacity(layout.lanes as usize);

        for (i, chunk) in blocks.chunks_mut(segment_len).enumerate() {
            if i as u32 % SYNC_POINTS == slice {
                writable.push(chunk);
                segments.push(&[]);
            } else {
                segments.push(&*chunk);
            }
        }

        (Self { segments, slice }, writable)
    }
}

/// Fills one segment (portion of a lane within a slice).
///
/// For each block position, this function:
/// 1. Takes a pseudo-random value from the address block or the previous block
/// 2. Computes the reference block position from it
/// 3. Computes the new block as G(previous, reference), XORed into the
///    existing block on later passes of version 0x13
pub(crate) fn fill_segment(
    shape: &InstanceShape,
    view: &SegmentView<'_>,
    pass: u32,
    lane: u32,
    current: &mut [Block],
) {
    let layout = &shape.layout;
    let slice = view.slice;
    let data_independent = shape.addressing.data_independent(pass, slice);

    let mut addresses = AddressGenerator::new(
        pass,
        lane,
        slice,
        layout.total_blocks,
        shape.passes,
        shape.variant_tag,
    );
    if data_independent {
        addresses.refresh();
    }

    let start_index = if pass == 0 && slice == 0 { 2 } else { 0 };
    let overwrite = pass == 0 || shape.version == Version::V0x10;

    for i in start_index..layout.segment_len {
        let index_in_lane = slice * layout.segment_len + i;
        let prev_index = if index_in_lane == 0 {
            layout.lane_len - 1
        } else {
            index_in_lane - 1
        };

        let pseudo_rand = if data_independent {
            if i != 0 && i % ADDRESSES_IN_BLOCK == 0 {
                addresses.refresh();
            }
            addresses.address(i)
        } else {
            block(layout, view, current, lane, lane, prev_index).0[0]
        };

        let position = Position {
            pass,
            lane,
            slice,
            index: i,
        };
        let ref_lane = reference_lane(layout, &position, pseudo_rand);
        let ref_index = index_alpha(layout, &position, pseudo_rand as u32, ref_lane == lane);

        let next = Block::compress(
            block(layout, view, current, lane, lane, prev_index),
            block(layout, view, current, lane, ref_lane, ref_index),
        );

        let target = &mut current[i as usize];
        if overwrite {
            target.copy_from(&next);
        } else {
            target.in_place_xor(&next);
        }
    }
}

/// Resolves a block by lane and lane-relative index.
#[inline]
fn block<'b>(
    layout: &MemoryLayout,
    view: &'b SegmentView<'_>,
    current: &'b [Block],
    own_lane: u32,
    lane: u32,
    index_in_lane: u32,
) -> &'b Block {
    let slice = index_in_lane / layout.segment_len;
    let offset = (index_in_lane % layout.segment_len) as usize;

    if lane == own_lane && slice == view.slice {
        &current[offset]
    } else {
        &view.segments[layout.segment(lane, slice)][offset]
    }
}
