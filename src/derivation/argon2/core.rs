use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use super::boundary::{fill_first_blocks, finalize, initial_hash};
use super::context::{Context, validate_inputs};
use super::encoding::{self, EncodedHash};
use super::error::Error;
use super::memory::{Arena, MemoryLayout};
use super::params::{MAX_OUTLEN, MIN_OUTLEN, Params, Variant};
use super::reference::Addressing;
use super::schedule::fill_memory_blocks;
use super::segment::InstanceShape;

/// Runs the Argon2 computation described by `context`.
///
/// The inputs are validated first; on success the tag is written into
/// `context.out`. Memory is allocated through the context's allocator pair
/// when one is installed and is wiped before release unless the context's
/// [`ZeroizePolicy`](super::params::ZeroizePolicy) retains it.
///
/// # Example
///
/// ```rust, ignore
/// use argon2_core::derivation::argon2::{Context, Variant, argon2_ctx};
///
/// let mut out = [0u8; 32];
/// let mut password = *b"password";
/// let mut context = Context::new(&mut out, &mut password, b"somesalt").with_costs(2, 64, 1);
///
/// argon2_ctx(&mut context, Variant::Argon2id).unwrap();
/// ```
pub fn argon2_ctx(context: &mut Context<'_>, variant: Variant) -> Result<(), Error> {
    validate_inputs(context)?;

    let layout = MemoryLayout::new(context.m_cost, context.lanes);

    let mut threads = context.threads;
    if threads > context.lanes {
        debug!(
            threads,
            lanes = context.lanes,
            "clamping argon2 threads to the lane count"
        );
        threads = context.lanes;
    }

    let shape = InstanceShape {
        layout,
        passes: context.t_cost,
        version: context.version,
        variant_tag: variant.tag(),
        addressing: Addressing::for_variant(variant),
    };

    let policy = context.zeroize;
    let mut arena = Arena::allocate(
        &layout,
        context.allocate.as_ref(),
        context.deallocate.clone(),
        policy,
    )?;

    debug!(
        %variant,
        version = context.version.as_u32(),
        lanes = layout.lanes,
        threads,
        memory_blocks = layout.total_blocks,
        segment_len = layout.segment_len,
        passes = shape.passes,
        "argon2 instance built"
    );

    let mut seed = initial_hash(context, variant)?;
    let seeded = fill_first_blocks(&mut seed, &layout, arena.blocks_mut(), policy);
    if policy.wipes() {
        seed.zeroize();
    }
    seeded?;

    fill_memory_blocks(&shape, threads, arena.blocks_mut())?;

    let out = context.out.as_deref_mut().ok_or(Error::OutputPtrNull)?;
    if let Err(error) = finalize(arena.blocks(), &layout, out, policy) {
        out.zeroize();
        return Err(error);
    }

    Ok(())
}

/// Computes a raw Argon2 tag of `params.tag_len` bytes.
///
/// The lane count of `params` is also used as the thread count.
///
/// # Example
///
/// ```rust, ignore
/// use argon2_core::derivation::argon2::{Params, Variant, hash};
///
/// let params = Params::new(65536, 2, 1, 32);
/// let tag = hash(b"password", b"somesalt", &params, Variant::Argon2id).unwrap();
/// ```
pub fn hash(
    password: &[u8],
    salt: &[u8],
    params: &Params,
    variant: Variant,
) -> Result<Vec<u8>, Error> {
    let mut tag = compute(password, salt, params, variant)?;
    Ok(std::mem::take(&mut *tag))
}

/// Computes an Argon2 tag and returns it in the PHC string format:
///
/// ```text
/// $argon2id$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc
/// ```
///
/// The string has no field for a secret or associated data, so `params`
/// carrying either is rejected with [`Error::IncorrectParameter`]. Keyed
/// hashes go through [`argon2_ctx`] and [`verify_ctx`].
pub fn hash_encoded(
    password: &[u8],
    salt: &[u8],
    params: &Params,
    variant: Variant,
) -> Result<String, Error> {
    if params.secret.is_some() || params.associated_data.is_some() {
        return Err(Error::IncorrectParameter);
    }

    let tag = compute(password, salt, params, variant)?;

    encoding::encode(&EncodedHash {
        variant,
        version: params.version,
        m_cost: params.mem_kib,
        t_cost: params.time,
        lanes: params.lanes,
        salt: salt.to_vec(),
        hash: tag,
    })
}

/// Computes an Argon2d tag. See [`hash`].
pub fn argon2d(password: &[u8], salt: &[u8], params: &Params) -> Result<Vec<u8>, Error> {
    hash(password, salt, params, Variant::Argon2d)
}

/// Computes an Argon2i tag. See [`hash`].
pub fn argon2i(password: &[u8], salt: &[u8], params: &Params) -> Result<Vec<u8>, Error> {
    hash(password, salt, params, Variant::Argon2i)
}

/// Computes an Argon2id tag. See [`hash`].
///
/// # Example
///
/// ```rust, ignore
/// use argon2_core::derivation::argon2::{argon2id, Params};
///
/// let password = b"my_password";
/// let salt = b"random_salt_16b!";
/// let params = Params::default();
///
/// let hash = argon2id(password, salt, &params).unwrap();
/// ```
pub fn argon2id(password: &[u8], salt: &[u8], params: &Params) -> Result<Vec<u8>, Error> {
    hash(password, salt, params, Variant::Argon2id)
}

/// Checks `password` against an encoded hash produced by [`hash_encoded`].
///
/// The encoded string must name `variant`. Returns
/// [`Error::VerifyMismatch`] when the recomputed tag differs; the
/// comparison runs in constant time.
pub fn verify(encoded: &str, password: &[u8], variant: Variant) -> Result<(), Error> {
    if password.len() as u64 > u32::MAX as u64 {
        return Err(Error::PwdTooLong);
    }

    let decoded = encoding::decode(encoded, variant)?;

    let mut out = Zeroizing::new(vec![0u8; decoded.hash.len()]);
    let mut pwd = Zeroizing::new(password.to_vec());

    let mut context = Context::new(&mut out, &mut pwd, &decoded.salt)
        .with_costs(decoded.t_cost, decoded.m_cost, decoded.lanes)
        .with_version(decoded.version);

    verify_ctx(&mut context, &decoded.hash, variant)
}

/// Runs `context` and compares the resulting tag with `expected` in
/// constant time.
pub fn verify_ctx(context: &mut Context<'_>, expected: &[u8], variant: Variant) -> Result<(), Error> {
    argon2_ctx(context, variant)?;

    let out = context.output().ok_or(Error::OutputPtrNull)?;
    if bool::from(out.ct_eq(expected)) {
        Ok(())
    } else {
        Err(Error::VerifyMismatch)
    }
}

/// Shared body of [`hash`] and [`hash_encoded`].
fn compute(
    password: &[u8],
    salt: &[u8],
    params: &Params,
    variant: Variant,
) -> Result<Zeroizing<Vec<u8>>, Error> {
    if password.len() as u64 > u32::MAX as u64 {
        return Err(Error::PwdTooLong);
    }
    if salt.len() as u64 > u32::MAX as u64 {
        return Err(Error::SaltTooLong);
    }
    if (params.tag_len as u64) < MIN_OUTLEN as u64 {
        return Err(Error::OutputTooShort);
    }
    if params.tag_len as u64 > MAX_OUTLEN as u64 {
        return Err(Error::OutputTooLong);
    }

    let mut out = Vec::new();
    out.try_reserve_exact(params.tag_len)
        .map_err(|_| Error::MemoryAllocationError)?;
    out.resize(params.tag_len, 0);
    let mut out = Zeroizing::new(out);

    let mut pwd = Zeroizing::new(password.to_vec());
    let mut secret = Zeroizing::new(params.secret.clone().unwrap_or_default());

    let mut context = Context::new(&mut out, &mut pwd, salt)
        .with_costs(params.time, params.mem_kib, params.lanes)
        .with_version(params.version);
    if params.secret.is_some() {
        context = context.with_secret(&mut secret);
    }
    if let Some(ad) = params.associated_data.as_deref() {
        context = context.with_associated_data(ad);
    }

    argon2_ctx(&mut context, variant)?;
    drop(context);

    Ok(out)
}
