//! PHC string encoding of Argon2 hashes.
//!
//! An encoded hash has the form
//!
//! ```text
//! $argon2<T>$v=<version>$m=<m_cost>,t=<t_cost>,p=<lanes>$<salt>$<hash>
//! ```
//!
//! where `<salt>` and `<hash>` are standard base64 without padding and all
//! numbers are decimal. The `v=` field may be absent, in which case the
//! hash is taken to be version 0x10.

use std::fmt::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use zeroize::{Zeroize, Zeroizing};

use super::error::Error;
use super::params::{MIN_OUTLEN, MIN_SALT_LENGTH, Variant, Version};

/// The fields of a PHC-encoded Argon2 hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedHash {
    pub variant: Variant,
    pub version: Version,
    pub m_cost: u32,
    pub t_cost: u32,
    pub lanes: u32,
    pub salt: Vec<u8>,
    pub hash: Zeroizing<Vec<u8>>,
}

impl Drop for EncodedHash {
    fn drop(&mut self) {
        self.salt.zeroize();
    }
}

/// Renders `parts` as a PHC string.
pub fn encode(parts: &EncodedHash) -> Result<String, Error> {
    if parts.salt.len() < MIN_SALT_LENGTH as usize {
        return Err(Error::SaltTooShort);
    }
    if parts.hash.len() < MIN_OUTLEN as usize {
        return Err(Error::OutputTooShort);
    }

    let mut encoded = String::with_capacity(encoded_len(
        parts.t_cost,
        parts.m_cost,
        parts.lanes,
        parts.salt.len(),
        parts.hash.len(),
        parts.variant,
    ));

    write!(
        encoded,
        "${}$v={}$m={},t={},p={}$",
        parts.variant,
        parts.version.as_u32(),
        parts.m_cost,
        parts.t_cost,
        parts.lanes,
    )
    .map_err(|_| Error::EncodingFail)?;

    STANDARD_NO_PAD.encode_string(&parts.salt, &mut encoded);
    encoded.push('$');
    STANDARD_NO_PAD.encode_string(parts.hash.as_slice(), &mut encoded);

    Ok(encoded)
}

/// Parses a PHC string that must name `variant`.
///
/// Structural problems (wrong prefix, malformed number, invalid base64,
/// trailing characters) yield [`Error::DecodingFail`]. A salt or hash
/// shorter than [`encode`] accepts yields [`Error::DecodingLengthFail`].
/// Cost and lane bounds are left to the parameter validator, so every
/// string [`encode`] produces decodes again.
pub fn decode(encoded: &str, variant: Variant) -> Result<EncodedHash, Error> {
    let mut fields = encoded.split('$');

    if fields.next() != Some("") {
        return Err(Error::DecodingFail);
    }
    if fields.next() != Some(variant.as_str(false)) {
        return Err(Error::DecodingFail);
    }

    let mut field = fields.next().ok_or(Error::DecodingFail)?;
    let version = match field.strip_prefix("v=") {
        Some(digits) => {
            let version = Version::try_from(parse_decimal(digits)?)
                .map_err(|_| Error::DecodingFail)?;
            field = fields.next().ok_or(Error::DecodingFail)?;
            version
        }
        None => Version::V0x10,
    };

    let mut costs = field.split(',');
    let m_cost = parse_named(costs.next(), "m=")?;
    let t_cost = parse_named(costs.next(), "t=")?;
    let lanes = parse_named(costs.next(), "p=")?;
    if costs.next().is_some() {
        return Err(Error::DecodingFail);
    }

    let salt = decode_base64(fields.next())?;
    let hash = Zeroizing::new(decode_base64(fields.next())?);

    if fields.next().is_some() {
        return Err(Error::DecodingFail);
    }

    if salt.len() < MIN_SALT_LENGTH as usize || hash.len() < MIN_OUTLEN as usize {
        return Err(Error::DecodingLengthFail);
    }

    Ok(EncodedHash {
        variant,
        version,
        m_cost,
        t_cost,
        lanes,
        salt,
        hash,
    })
}

/// Length of the encoded string for the given parameters, counting one
/// extra byte for a terminator.
pub fn encoded_len(
    t_cost: u32,
    m_cost: u32,
    lanes: u32,
    salt_len: usize,
    hash_len: usize,
    variant: Variant,
) -> usize {
    "$$v=$m=,t=,p=$$".len()
        + variant.as_str(false).len()
        + numlen(t_cost)
        + numlen(m_cost)
        + numlen(lanes)
        + b64len(salt_len)
        + b64len(hash_len)
        + numlen(Version::V0x13.as_u32())
        + 1
}

/// Length of the unpadded base64 encoding of `len` bytes.
pub fn b64len(len: usize) -> usize {
    let full = len / 3 * 4;
    match len % 3 {
        2 => full + 3,
        1 => full + 2,
        _ => full,
    }
}

/// Number of decimal digits of `num`.
pub fn numlen(mut num: u32) -> usize {
    let mut len = 1;
    while num >= 10 {
        num /= 10;
        len += 1;
    }
    len
}

/// Parses `name<decimal>`.
fn parse_named(field: Option<&str>, name: &str) -> Result<u32, Error> {
    field
        .and_then(|f| f.strip_prefix(name))
        .ok_or(Error::DecodingFail)
        .and_then(parse_decimal)
}

/// Parses an unsigned decimal without sign or leading zeros.
fn parse_decimal(digits: &str) -> Result<u32, Error> {
    let canonical = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));

    if !canonical {
        return Err(Error::DecodingFail);
    }

    digits.parse().map_err(|_| Error::DecodingFail)
}

fn decode_base64(field: Option<&str>) -> Result<Vec<u8>, Error> {
    let field = field.ok_or(Error::DecodingFail)?;
    STANDARD_NO_PAD
        .decode(field)
        .map_err(|_| Error::DecodingFail)
}
