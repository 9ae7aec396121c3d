//! Parameter definitions for Argon2.
//!
//! This module defines the algorithm variants and versions, the hard limits
//! every input is checked against, and the high-level [`Params`] bundle
//! used by the convenience entry points.

use std::fmt;
use std::str::FromStr;

use super::error::Error;

/// Number of synchronization points (slices) per pass.
pub const SYNC_POINTS: u32 = 4;

/// Minimum and maximum number of lanes (degree of parallelism).
pub const MIN_LANES: u32 = 1;
pub const MAX_LANES: u32 = 0x00FF_FFFF;

/// Minimum and maximum number of threads.
pub const MIN_THREADS: u32 = 1;
pub const MAX_THREADS: u32 = 0x00FF_FFFF;

/// Minimum and maximum digest size in bytes.
pub const MIN_OUTLEN: u32 = 4;
pub const MAX_OUTLEN: u32 = u32::MAX;

/// Minimum number of memory blocks: two blocks per slice.
pub const MIN_MEMORY: u32 = 2 * SYNC_POINTS;

const MAX_MEMORY_BITS: u32 = {
    let addressable = usize::BITS - 10 - 1;
    if addressable < 32 { addressable } else { 32 }
};

/// Maximum number of memory blocks: half the address space, capped at
/// `u32::MAX` blocks.
pub const MAX_MEMORY: u32 = if MAX_MEMORY_BITS >= 32 {
    u32::MAX
} else {
    1 << MAX_MEMORY_BITS
};

/// Minimum and maximum number of passes.
pub const MIN_TIME: u32 = 1;
pub const MAX_TIME: u32 = u32::MAX;

/// Minimum and maximum password length in bytes.
pub const MIN_PWD_LENGTH: u32 = 0;
pub const MAX_PWD_LENGTH: u32 = u32::MAX;

/// Minimum and maximum associated data length in bytes.
pub const MIN_AD_LENGTH: u32 = 0;
pub const MAX_AD_LENGTH: u32 = u32::MAX;

/// Minimum and maximum salt length in bytes.
pub const MIN_SALT_LENGTH: u32 = 8;
pub const MAX_SALT_LENGTH: u32 = u32::MAX;

/// Minimum and maximum secret length in bytes.
pub const MIN_SECRET: u32 = 0;
pub const MAX_SECRET: u32 = u32::MAX;

/// Argon2 algorithm variant.
///
/// The variants differ only in how reference blocks are addressed:
///
/// - [`Variant::Argon2d`] derives addresses from block contents
///   (data-dependent). Fastest, but only suitable where side channels are
///   not a concern.
/// - [`Variant::Argon2i`] derives addresses from a counter
///   (data-independent).
/// - [`Variant::Argon2id`] is data-independent for the first half of the
///   first pass and data-dependent afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum Variant {
    Argon2d = 0,
    Argon2i = 1,
    #[default]
    Argon2id = 2,
}

impl Variant {
    /// Name of the variant, e.g. `argon2id` or `Argon2id`.
    pub fn as_str(self, uppercase: bool) -> &'static str {
        match (self, uppercase) {
            (Variant::Argon2d, false) => "argon2d",
            (Variant::Argon2d, true) => "Argon2d",
            (Variant::Argon2i, false) => "argon2i",
            (Variant::Argon2i, true) => "Argon2i",
            (Variant::Argon2id, false) => "argon2id",
            (Variant::Argon2id, true) => "Argon2id",
        }
    }

    /// Numeric type tag hashed into H0 and into address blocks.
    pub fn tag(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Variant {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Variant::Argon2d),
            1 => Ok(Variant::Argon2i),
            2 => Ok(Variant::Argon2id),
            _ => Err(Error::IncorrectType),
        }
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "argon2d" | "Argon2d" => Ok(Variant::Argon2d),
            "argon2i" | "Argon2i" => Ok(Variant::Argon2i),
            "argon2id" | "Argon2id" => Ok(Variant::Argon2id),
            _ => Err(Error::IncorrectType),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str(false))
    }
}

/// Argon2 algorithm version.
///
/// Version 0x10 overwrites blocks on later passes; version 0x13 XORs the new
/// value into the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum Version {
    V0x10 = 0x10,
    #[default]
    V0x13 = 0x13,
}

impl Version {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Version {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0x10 => Ok(Version::V0x10),
            0x13 => Ok(Version::V0x13),
            _ => Err(Error::IncorrectParameter),
        }
    }
}

/// Controls which caller buffers are wiped once they have been absorbed
/// into the pre-hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    /// Wipe the password buffer and zero its declared length.
    pub clear_password: bool,
    /// Wipe the secret buffer and zero its declared length.
    pub clear_secret: bool,
}

impl Flags {
    pub const DEFAULT: Self = Self {
        clear_password: false,
        clear_secret: false,
    };
}

/// Whether internal buffers (memory arena, pre-hash, scratch blocks) are
/// zeroed before being released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroizePolicy {
    #[default]
    Wipe,
    Retain,
}

impl ZeroizePolicy {
    #[inline]
    pub(crate) fn wipes(self) -> bool {
        self == ZeroizePolicy::Wipe
    }
}

/// Configuration parameters for the high-level Argon2 entry points.
///
/// These parameters control the memory and time cost of the hash function,
/// allowing the security level to be tuned for the target hardware and
/// threat model. Every field is checked by the parameter validator when a
/// hash is computed.
///
/// # Recommended Values
///
/// For password hashing, OWASP recommends Argon2id with:
/// - `mem_kib`: 19456 (19 MiB) minimum, 47104 (46 MiB) for higher security
/// - `time`: 2 passes minimum
/// - `lanes`: 1 (single-threaded) or number of available cores
/// - `tag_len`: 32 bytes for most applications
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Params {
    /// Memory size in KiB (minimum 8 × lanes).
    pub mem_kib: u32,
    /// Number of passes over memory (minimum 1).
    pub time: u32,
    /// Degree of parallelism: number of lanes, also used as thread count.
    pub lanes: u32,
    /// Length of the output tag in bytes (minimum 4).
    pub tag_len: usize,
    /// Algorithm version.
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: Version,
    /// Optional secret key for keyed hashing.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub secret: Option<Vec<u8>>,
    /// Optional associated data.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub associated_data: Option<Vec<u8>>,
}

impl Params {
    /// Creates parameters with the given costs, no secret and no
    /// associated data.
    pub fn new(mem_kib: u32, time: u32, lanes: u32, tag_len: usize) -> Self {
        Self {
            mem_kib,
            time,
            lanes,
            tag_len,
            version: Version::V0x13,
            secret: None,
            associated_data: None,
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_associated_data(mut self, associated_data: impl Into<Vec<u8>>) -> Self {
        self.associated_data = Some(associated_data.into());
        self
    }
}

impl Default for Params {
    /// Default parameters: 64 MiB memory, 3 passes, 1 lane, 32-byte tag.
    fn default() -> Self {
        Self::new(64 * 1024, 3, 1, 32)
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Params")
            .field("mem_kib", &self.mem_kib)
            .field("time", &self.time)
            .field("lanes", &self.lanes)
            .field("tag_len", &self.tag_len)
            .field("version", &self.version)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field(
                "associated_data_len",
                &self.associated_data.as_ref().map(Vec::len),
            )
            .finish()
    }
}

impl Drop for Params {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(secret) = self.secret.as_mut() {
            secret.zeroize();
        }
    }
}
