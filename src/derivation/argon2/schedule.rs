//! Pass and slice scheduling for Argon2.
//!
//! Memory is filled pass by pass, and within a pass slice by slice. All
//! segments of one slice are independent of each other, so they can be
//! filled concurrently; every slice ends with a synchronization point
//! before the next one starts.

use std::thread;

use tracing::{trace, warn};

use super::block::Block;
use super::error::Error;
use super::params::SYNC_POINTS;
use super::segment::{InstanceShape, SegmentView, fill_segment};

/// Fills every block of `blocks` after the first two of each lane.
///
/// With `threads <= 1` all segments run on the calling thread in lane order.
/// Otherwise each slice is spread over at most `min(threads, lanes)` scoped
/// workers, lanes assigned round-robin. A worker that cannot be spawned or
/// that panics fails the whole computation with [`Error::ThreadFailure`],
/// after all workers of the slice have been joined.
pub(crate) fn fill_memory_blocks(
    shape: &InstanceShape,
    threads: u32,
    blocks: &mut [Block],
) -> Result<(), Error> {
    let workers = threads.min(shape.layout.lanes).max(1) as usize;

    for pass in 0..shape.passes {
        for slice in 0..SYNC_POINTS {
            let (view, segments) = SegmentView::split(&mut *blocks, &shape.layout, slice);

            if workers == 1 {
                for (lane, segment) in segments.into_iter().enumerate() {
                    fill_segment(shape, &view, pass, lane as u32, segment);
                }
            } else {
                fill_slice_parallel(shape, &view, pass, segments, workers)?;
            }
        }

        trace!(pass, passes = shape.passes, "argon2 pass complete");
    }

    Ok(())
}

/// Fills the segments of one slice on `workers` scoped threads.
fn fill_slice_parallel(
    shape: &InstanceShape,
    view: &SegmentView<'_>,
    pass: u32,
    segments: Vec<&mut [Block]>,
    workers: usize,
) -> Result<(), Error> {
    let mut buckets: Vec<Vec<(u32, &mut [Block])>> = (0..workers).map(|_| Vec::new()).collect();
    for (lane, segment) in segments.into_iter().enumerate() {
        buckets[lane % workers].push((lane as u32, segment));
    }

    run_workers(buckets, &|(lane, segment): (u32, &mut [Block])| {
        fill_segment(shape, view, pass, lane, segment);
    })
}

/// Runs `work` over every item, one scoped thread per bucket.
///
/// Every spawned worker is joined before returning, even after a spawn
/// error or a panic; either one is reported as [`Error::ThreadFailure`].
fn run_workers<T, F>(buckets: Vec<Vec<T>>, work: &F) -> Result<(), Error>
where
    T: Send,
    F: Fn(T) + Sync,
{
    thread::scope(|scope| {
        let mut result = Ok(());
        let mut handles = Vec::with_capacity(buckets.len());

        for (worker, bucket) in buckets.into_iter().enumerate() {
            let spawned = thread::Builder::new()
                .name(format!("argon2-worker-{worker}"))
                .spawn_scoped(scope, move || bucket.into_iter().for_each(work));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(error) => {
                    warn!(worker, %error, "failed to spawn argon2 worker");
                    result = Err(Error::ThreadFailure);
                    break;
                }
            }
        }

        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                warn!(worker, "argon2 worker panicked");
                result = Err(Error::ThreadFailure);
            }
        }

        result
    })
}
