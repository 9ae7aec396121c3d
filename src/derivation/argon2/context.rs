//! The Argon2 parameter bundle and its validation.
//!
//! A [`Context`] carries every input of one Argon2 computation: the output
//! buffer, the password, salt, optional secret and associated data (each
//! with the length the caller declares for it), the cost parameters, the
//! version, the wipe flags and an optional allocator pair.
//!
//! # Caller-visible side effects
//!
//! The password and secret are borrowed **mutably**. When
//! [`Flags::clear_password`] or [`Flags::clear_secret`] is set, the
//! corresponding buffer is overwritten with zeros as soon as it has been
//! absorbed into the pre-hash, and its declared length is set to 0. This is
//! the only way a computation modifies caller-owned memory besides writing
//! the output.

use super::error::Error;
use super::memory::{AllocateFn, DeallocateFn};
use super::params::{
    Flags, MAX_AD_LENGTH, MAX_LANES, MAX_MEMORY, MAX_OUTLEN, MAX_PWD_LENGTH, MAX_SALT_LENGTH,
    MAX_SECRET, MAX_THREADS, MAX_TIME, MIN_AD_LENGTH, MIN_LANES, MIN_MEMORY, MIN_OUTLEN,
    MIN_PWD_LENGTH, MIN_SALT_LENGTH, MIN_SECRET, MIN_THREADS, MIN_TIME, Version, ZeroizePolicy,
};

/// Inputs and output of one Argon2 computation.
///
/// Every `*_len` field is the length the caller declares for the matching
/// buffer. A missing buffer with a non-zero declared length, or a buffer
/// whose size differs from its declared length, is rejected by
/// [`validate_inputs`] with the matching `*PtrMismatch` error.
pub struct Context<'a> {
    pub out: Option<&'a mut [u8]>,
    pub out_len: u32,
    pub pwd: Option<&'a mut [u8]>,
    pub pwd_len: u32,
    pub salt: Option<&'a [u8]>,
    pub salt_len: u32,
    pub secret: Option<&'a mut [u8]>,
    pub secret_len: u32,
    pub ad: Option<&'a [u8]>,
    pub ad_len: u32,
    /// Number of passes.
    pub t_cost: u32,
    /// Requested memory in KiB (one block per KiB).
    pub m_cost: u32,
    pub lanes: u32,
    /// Maximum number of worker threads; clamped to `lanes`.
    pub threads: u32,
    pub version: Version,
    pub flags: Flags,
    pub zeroize: ZeroizePolicy,
    pub allocate: Option<AllocateFn>,
    pub deallocate: Option<DeallocateFn>,
}

impl<'a> Context<'a> {
    /// Creates a context writing into `out`, with declared lengths taken
    /// from the buffers, a single lane and the minimum costs.
    pub fn new(out: &'a mut [u8], pwd: &'a mut [u8], salt: &'a [u8]) -> Self {
        Self {
            out_len: declared_len(out),
            out: Some(out),
            pwd_len: declared_len(pwd),
            pwd: Some(pwd),
            salt_len: declared_len(salt),
            salt: Some(salt),
            secret: None,
            secret_len: 0,
            ad: None,
            ad_len: 0,
            t_cost: MIN_TIME,
            m_cost: MIN_MEMORY,
            lanes: MIN_LANES,
            threads: MIN_THREADS,
            version: Version::default(),
            flags: Flags::DEFAULT,
            zeroize: ZeroizePolicy::default(),
            allocate: None,
            deallocate: None,
        }
    }

    /// Sets time cost, memory cost and lanes; the thread count follows the
    /// lane count.
    pub fn with_costs(mut self, t_cost: u32, m_cost: u32, lanes: u32) -> Self {
        self.t_cost = t_cost;
        self.m_cost = m_cost;
        self.lanes = lanes;
        self.threads = lanes;
        self
    }

    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_secret(mut self, secret: &'a mut [u8]) -> Self {
        self.secret_len = declared_len(secret);
        self.secret = Some(secret);
        self
    }

    pub fn with_associated_data(mut self, ad: &'a [u8]) -> Self {
        self.ad_len = declared_len(ad);
        self.ad = Some(ad);
        self
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_zeroize_policy(mut self, policy: ZeroizePolicy) -> Self {
        self.zeroize = policy;
        self
    }

    /// Installs a custom allocator pair.
    pub fn with_allocator(mut self, allocate: AllocateFn, deallocate: DeallocateFn) -> Self {
        self.allocate = Some(allocate);
        self.deallocate = Some(deallocate);
        self
    }

    /// The output written by the last successful computation.
    pub fn output(&self) -> Option<&[u8]> {
        self.out.as_deref()
    }
}

/// Declared length of a buffer; sizes beyond `u32::MAX` saturate and are
/// reported as too long by the validator.
fn declared_len(buf: &[u8]) -> u32 {
    u32::try_from(buf.len()).unwrap_or(u32::MAX)
}

/// Checks one optional input against its declared length and bounds.
fn check_field(
    data: Option<&[u8]>,
    declared: u32,
    min: u32,
    max: u32,
    mismatch: Error,
    too_short: Error,
    too_long: Error,
) -> Result<(), Error> {
    match data {
        None if declared != 0 => return Err(mismatch),
        None => {}
        Some(buf) if buf.len() as u64 > max as u64 => return Err(too_long),
        Some(buf) if buf.len() as u64 != declared as u64 => return Err(mismatch),
        Some(_) => {}
    }

    if declared < min {
        return Err(too_short);
    }
    if declared > max {
        return Err(too_long);
    }

    Ok(())
}

/// Validates every input of `context` against the Argon2 limits.
///
/// Checks run in a fixed order and the first violated constraint is
/// reported: output, password, salt, secret, associated data, memory cost
/// (including `m_cost >= 8 × lanes`), time cost, lanes, threads and finally
/// the allocator pair, which must be supplied together or not at all.
///
/// Missing password and salt buffers are accepted when their declared
/// length is 0; the salt then fails its minimum-length check.
pub fn validate_inputs(context: &Context<'_>) -> Result<(), Error> {
    let out = context.out.as_deref().ok_or(Error::OutputPtrNull)?;

    if context.out_len < MIN_OUTLEN {
        return Err(Error::OutputTooShort);
    }
    if context.out_len > MAX_OUTLEN {
        return Err(Error::OutputTooLong);
    }
    if out.len() as u64 != context.out_len as u64 {
        return Err(Error::OutPtrMismatch);
    }

    check_field(
        context.pwd.as_deref(),
        context.pwd_len,
        MIN_PWD_LENGTH,
        MAX_PWD_LENGTH,
        Error::PwdPtrMismatch,
        Error::PwdTooShort,
        Error::PwdTooLong,
    )?;

    check_field(
        context.salt,
        context.salt_len,
        MIN_SALT_LENGTH,
        MAX_SALT_LENGTH,
        Error::SaltPtrMismatch,
        Error::SaltTooShort,
        Error::SaltTooLong,
    )?;

    check_field(
        context.secret.as_deref(),
        context.secret_len,
        MIN_SECRET,
        MAX_SECRET,
        Error::SecretPtrMismatch,
        Error::SecretTooShort,
        Error::SecretTooLong,
    )?;

    check_field(
        context.ad,
        context.ad_len,
        MIN_AD_LENGTH,
        MAX_AD_LENGTH,
        Error::AdPtrMismatch,
        Error::AdTooShort,
        Error::AdTooLong,
    )?;

    if context.m_cost < MIN_MEMORY {
        return Err(Error::MemoryTooLittle);
    }
    if context.m_cost > MAX_MEMORY {
        return Err(Error::MemoryTooMuch);
    }
    if (context.m_cost as u64) < 8 * context.lanes as u64 {
        return Err(Error::MemoryTooLittle);
    }

    if context.t_cost < MIN_TIME {
        return Err(Error::TimeTooSmall);
    }
    if context.t_cost > MAX_TIME {
        return Err(Error::TimeTooLarge);
    }

    if context.lanes < MIN_LANES {
        return Err(Error::LanesTooFew);
    }
    if context.lanes > MAX_LANES {
        return Err(Error::LanesTooMany);
    }

    if context.threads < MIN_THREADS {
        return Err(Error::ThreadsTooFew);
    }
    if context.threads > MAX_THREADS {
        return Err(Error::ThreadsTooMany);
    }

    match (&context.allocate, &context.deallocate) {
        (Some(_), None) => Err(Error::FreeMemoryCbkNull),
        (None, Some(_)) => Err(Error::AllocateMemoryCbkNull),
        _ => Ok(()),
    }
}
