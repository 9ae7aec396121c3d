use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use argon2_core::derivation::argon2::{
    AllocateFn, Block, Context, DeallocateFn, Error, Flags, MemoryLayout, Variant, Version,
    ZeroizePolicy, argon2_ctx,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn layout_is_aligned_to_lanes(m_cost in 8u32..=1 << 16, lanes in 1u32..=64) {
        let layout = MemoryLayout::new(m_cost, lanes);

        prop_assert_eq!(layout.total_blocks % (4 * lanes), 0);
        prop_assert!(layout.total_blocks >= 8 * lanes);
        prop_assert!(layout.total_blocks <= m_cost.max(8 * lanes));
        prop_assert!(layout.segment_len >= 2);
        prop_assert_eq!(layout.lane_len, 4 * layout.segment_len);
        prop_assert_eq!(layout.total_blocks, layout.lane_len * lanes);
    }
}

#[test]
fn layout_rounds_down_to_a_multiple_of_four_lanes() {
    let layout = MemoryLayout::new(64, 3);
    assert_eq!(layout.total_blocks, 60);
    assert_eq!(layout.segment_len, 5);

    let layout = MemoryLayout::new(8, 4);
    assert_eq!(layout.total_blocks, 32);
    assert_eq!(layout.index(1, 0), 8);
}

fn run(variant: Variant, lanes: u32, threads: u32) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut out, &mut pwd, b"saltsalt")
        .with_costs(2, 256, lanes)
        .with_threads(threads);

    argon2_ctx(&mut context, variant).unwrap();
    drop(context);
    out
}

#[test]
fn thread_count_does_not_change_the_tag() {
    for variant in [Variant::Argon2d, Variant::Argon2i, Variant::Argon2id] {
        let sequential = run(variant, 4, 1);

        for threads in [2, 3, 4, 16] {
            assert_eq!(
                run(variant, 4, threads),
                sequential,
                "{variant} threads={threads}"
            );
        }
    }
}

#[test]
fn clear_flags_wipe_caller_buffers() {
    let mut out = [0u8; 32];
    let mut pwd = *b"password";
    let mut secret = *b"pepper";
    let mut context = Context::new(&mut out, &mut pwd, b"saltsalt")
        .with_costs(1, 32, 1)
        .with_secret(&mut secret)
        .with_flags(Flags {
            clear_password: true,
            clear_secret: true,
        });

    argon2_ctx(&mut context, Variant::Argon2id).unwrap();
    assert_eq!(context.pwd_len, 0);
    assert_eq!(context.secret_len, 0);
    drop(context);

    assert_eq!(pwd, [0u8; 8]);
    assert_eq!(secret, [0u8; 6]);
    assert_ne!(out, [0u8; 32]);
}

#[test]
fn buffers_are_kept_without_flags() {
    let mut out = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut out, &mut pwd, b"saltsalt").with_costs(1, 32, 1);

    argon2_ctx(&mut context, Variant::Argon2id).unwrap();
    assert_eq!(context.pwd_len, 8);
    drop(context);

    assert_eq!(&pwd, b"password");
}

#[test]
fn clearing_the_password_does_not_change_the_tag() {
    let mut plain = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut plain, &mut pwd, b"saltsalt").with_costs(1, 32, 1);
    argon2_ctx(&mut context, Variant::Argon2i).unwrap();
    drop(context);

    let mut cleared = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut cleared, &mut pwd, b"saltsalt")
        .with_costs(1, 32, 1)
        .with_flags(Flags {
            clear_password: true,
            clear_secret: false,
        });
    argon2_ctx(&mut context, Variant::Argon2i).unwrap();
    drop(context);

    assert_eq!(plain, cleared);
}

/// Allocator pair that counts calls and records whether the arena came
/// back wiped.
struct Recorder {
    allocations: Arc<AtomicUsize>,
    released_zeroed: Arc<Mutex<Option<bool>>>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            allocations: Arc::new(AtomicUsize::new(0)),
            released_zeroed: Arc::new(Mutex::new(None)),
        }
    }

    fn pair(&self) -> (AllocateFn, DeallocateFn) {
        let allocations = Arc::clone(&self.allocations);
        let allocate: AllocateFn = Arc::new(move |bytes| {
            allocations.fetch_add(1, Ordering::SeqCst);
            Some(vec![Block::ZERO; bytes / 1024])
        });

        let released_zeroed = Arc::clone(&self.released_zeroed);
        let deallocate: DeallocateFn = Arc::new(move |blocks, bytes| {
            assert_eq!(blocks.len() * 1024, bytes);
            *released_zeroed.lock().unwrap() = Some(blocks.iter().all(Block::is_zero));
        });

        (allocate, deallocate)
    }
}

fn run_with_allocator(recorder: &Recorder, policy: ZeroizePolicy) -> [u8; 32] {
    let (allocate, deallocate) = recorder.pair();

    let mut out = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut out, &mut pwd, b"saltsalt")
        .with_costs(2, 64, 2)
        .with_zeroize_policy(policy)
        .with_allocator(allocate, deallocate);

    argon2_ctx(&mut context, Variant::Argon2id).unwrap();
    drop(context);
    out
}

#[test]
fn custom_allocator_receives_wiped_memory() {
    let recorder = Recorder::new();
    let tag = run_with_allocator(&recorder, ZeroizePolicy::Wipe);

    assert_eq!(recorder.allocations.load(Ordering::SeqCst), 1);
    assert_eq!(*recorder.released_zeroed.lock().unwrap(), Some(true));
    assert_ne!(tag, [0u8; 32]);
}

#[test]
fn retain_policy_skips_the_wipe() {
    let recorder = Recorder::new();
    let retained = run_with_allocator(&recorder, ZeroizePolicy::Retain);
    assert_eq!(*recorder.released_zeroed.lock().unwrap(), Some(false));

    let wiped = run_with_allocator(&Recorder::new(), ZeroizePolicy::Wipe);
    assert_eq!(retained, wiped);
}

#[test]
fn custom_allocator_matches_default_allocation() {
    let recorder = Recorder::new();
    let (allocate, deallocate) = recorder.pair();

    let mut custom = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut custom, &mut pwd, b"saltsalt")
        .with_costs(2, 64, 2)
        .with_allocator(allocate, deallocate);
    argon2_ctx(&mut context, Variant::Argon2d).unwrap();
    drop(context);

    let mut default = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut default, &mut pwd, b"saltsalt").with_costs(2, 64, 2);
    argon2_ctx(&mut context, Variant::Argon2d).unwrap();
    drop(context);

    assert_eq!(custom, default);
}

#[test]
fn failing_allocator_reports_allocation_error() {
    let allocate: AllocateFn = Arc::new(|_| None);
    let deallocate: DeallocateFn = Arc::new(|_, _| {});

    let mut out = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut out, &mut pwd, b"saltsalt")
        .with_costs(1, 32, 1)
        .with_allocator(allocate, deallocate);

    assert_eq!(
        argon2_ctx(&mut context, Variant::Argon2id),
        Err(Error::MemoryAllocationError)
    );
}

#[test]
fn short_allocation_is_returned_and_rejected() {
    let released = Arc::new(AtomicUsize::new(0));
    let released_in_hook = Arc::clone(&released);

    let allocate: AllocateFn = Arc::new(|bytes| Some(vec![Block::ZERO; bytes / 1024 - 1]));
    let deallocate: DeallocateFn = Arc::new(move |_, _| {
        released_in_hook.fetch_add(1, Ordering::SeqCst);
    });

    let mut out = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut out, &mut pwd, b"saltsalt")
        .with_costs(1, 32, 1)
        .with_allocator(allocate, deallocate);

    assert_eq!(
        argon2_ctx(&mut context, Variant::Argon2id),
        Err(Error::MemoryAllocationError)
    );
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[test]
fn version_is_hashed_into_the_tag() {
    let mut v10 = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut v10, &mut pwd, b"saltsalt")
        .with_costs(1, 32, 1)
        .with_version(Version::V0x10);
    argon2_ctx(&mut context, Variant::Argon2d).unwrap();
    drop(context);

    let mut v13 = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut v13, &mut pwd, b"saltsalt")
        .with_costs(1, 32, 1)
        .with_version(Version::V0x13);
    argon2_ctx(&mut context, Variant::Argon2d).unwrap();
    drop(context);

    // A single pass never XORs, so only the hashed version differs.
    assert_ne!(v10, v13);
}
