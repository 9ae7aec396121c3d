//! Error taxonomy for Argon2.
//!
//! Every failure maps to a stable negative integer code so callers that
//! persist or forward results across process boundaries can round-trip
//! them. The display string of each variant is the message returned by
//! [`error_message`].

use thiserror::Error;

use crate::hash::LongHashError;

/// Errors returned by Argon2 operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Error {
    #[error("Output buffer is missing")]
    OutputPtrNull = -1,
    #[error("Output is too short")]
    OutputTooShort = -2,
    #[error("Output is too long")]
    OutputTooLong = -3,

    #[error("Password is too short")]
    PwdTooShort = -4,
    #[error("Password is too long")]
    PwdTooLong = -5,

    #[error("Salt is too short")]
    SaltTooShort = -6,
    #[error("Salt is too long")]
    SaltTooLong = -7,

    #[error("Associated data is too short")]
    AdTooShort = -8,
    #[error("Associated data is too long")]
    AdTooLong = -9,

    #[error("Secret is too short")]
    SecretTooShort = -10,
    #[error("Secret is too long")]
    SecretTooLong = -11,

    #[error("Time cost is too small")]
    TimeTooSmall = -12,
    #[error("Time cost is too large")]
    TimeTooLarge = -13,

    #[error("Memory cost is too small")]
    MemoryTooLittle = -14,
    #[error("Memory cost is too large")]
    MemoryTooMuch = -15,

    #[error("Too few lanes")]
    LanesTooFew = -16,
    #[error("Too many lanes")]
    LanesTooMany = -17,

    #[error("Password buffer does not match the declared password length")]
    PwdPtrMismatch = -18,
    #[error("Salt buffer does not match the declared salt length")]
    SaltPtrMismatch = -19,
    #[error("Secret buffer does not match the declared secret length")]
    SecretPtrMismatch = -20,
    #[error("Associated data buffer does not match the declared associated data length")]
    AdPtrMismatch = -21,

    #[error("Memory allocation error")]
    MemoryAllocationError = -22,

    #[error("The deallocate callback is missing")]
    FreeMemoryCbkNull = -23,
    #[error("The allocate callback is missing")]
    AllocateMemoryCbkNull = -24,

    #[error("Incorrect parameter")]
    IncorrectParameter = -25,
    #[error("There is no such version of Argon2")]
    IncorrectType = -26,

    #[error("Output buffer does not match the output length")]
    OutPtrMismatch = -27,

    #[error("Not enough threads")]
    ThreadsTooFew = -28,
    #[error("Too many threads")]
    ThreadsTooMany = -29,

    #[error("Missing arguments")]
    MissingArgs = -30,

    #[error("Encoding failed")]
    EncodingFail = -31,
    #[error("Decoding failed")]
    DecodingFail = -32,

    #[error("Threading failure")]
    ThreadFailure = -33,

    #[error("Some of encoded parameters are too long or too short")]
    DecodingLengthFail = -34,

    #[error("The password does not match the supplied hash")]
    VerifyMismatch = -35,
}

const ALL: [Error; 35] = [
    Error::OutputPtrNull,
    Error::OutputTooShort,
    Error::OutputTooLong,
    Error::PwdTooShort,
    Error::PwdTooLong,
    Error::SaltTooShort,
    Error::SaltTooLong,
    Error::AdTooShort,
    Error::AdTooLong,
    Error::SecretTooShort,
    Error::SecretTooLong,
    Error::TimeTooSmall,
    Error::TimeTooLarge,
    Error::MemoryTooLittle,
    Error::MemoryTooMuch,
    Error::LanesTooFew,
    Error::LanesTooMany,
    Error::PwdPtrMismatch,
    Error::SaltPtrMismatch,
    Error::SecretPtrMismatch,
    Error::AdPtrMismatch,
    Error::MemoryAllocationError,
    Error::FreeMemoryCbkNull,
    Error::AllocateMemoryCbkNull,
    Error::IncorrectParameter,
    Error::IncorrectType,
    Error::OutPtrMismatch,
    Error::ThreadsTooFew,
    Error::ThreadsTooMany,
    Error::MissingArgs,
    Error::EncodingFail,
    Error::DecodingFail,
    Error::ThreadFailure,
    Error::DecodingLengthFail,
    Error::VerifyMismatch,
];

impl Error {
    /// Stable numeric code of this error (always negative).
    ///
    /// Codes run from `-1` ([`Error::OutputPtrNull`]) to `-35`
    /// ([`Error::VerifyMismatch`]); `0` is reserved for success.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Looks up the error for a numeric code.
    ///
    /// Returns `None` for `0` (success) and for unknown codes.
    pub fn from_code(code: i32) -> Option<Self> {
        ALL.iter().copied().find(|e| e.code() == code)
    }

    /// Whether this error reports a wrong password rather than a
    /// structural problem with the inputs.
    pub fn is_mismatch(self) -> bool {
        self == Error::VerifyMismatch
    }
}

impl From<LongHashError> for Error {
    fn from(_: LongHashError) -> Self {
        Error::IncorrectParameter
    }
}

/// Returns the human-readable message for a numeric error code.
pub fn error_message(code: i32) -> &'static str {
    match code {
        0 => "OK",
        _ => match Error::from_code(code) {
            Some(error) => message(error),
            None => "Unknown error code",
        },
    }
}

fn message(error: Error) -> &'static str {
    match error {
        Error::OutputPtrNull => "Output buffer is missing",
        Error::OutputTooShort => "Output is too short",
        Error::OutputTooLong => "Output is too long",
        Error::PwdTooShort => "Password is too short",
        Error::PwdTooLong => "Password is too long",
        Error::SaltTooShort => "Salt is too short",
        Error::SaltTooLong => "Salt is too long",
        Error::AdTooShort => "Associated data is too short",
        Error::AdTooLong => "Associated data is too long",
        Error::SecretTooShort => "Secret is too short",
        Error::SecretTooLong => "Secret is too long",
        Error::TimeTooSmall => "Time cost is too small",
        Error::TimeTooLarge => "Time cost is too large",
        Error::MemoryTooLittle => "Memory cost is too small",
        Error::MemoryTooMuch => "Memory cost is too large",
        Error::LanesTooFew => "Too few lanes",
        Error::LanesTooMany => "Too many lanes",
        Error::PwdPtrMismatch => "Password buffer does not match the declared password length",
        Error::SaltPtrMismatch => "Salt buffer does not match the declared salt length",
        Error::SecretPtrMismatch => "Secret buffer does not match the declared secret length",
        Error::AdPtrMismatch => "Associated data buffer does not match the declared associated data length",
        Error::MemoryAllocationError => "Memory allocation error",
        Error::FreeMemoryCbkNull => "The deallocate callback is missing",
        Error::AllocateMemoryCbkNull => "The allocate callback is missing",
        Error::IncorrectParameter => "Incorrect parameter",
        Error::IncorrectType => "There is no such version of Argon2",
        Error::OutPtrMismatch => "Output buffer does not match the output length",
        Error::ThreadsTooFew => "Not enough threads",
        Error::ThreadsTooMany => "Too many threads",
        Error::MissingArgs => "Missing arguments",
        Error::EncodingFail => "Encoding failed",
        Error::DecodingFail => "Decoding failed",
        Error::ThreadFailure => "Threading failure",
        Error::DecodingLengthFail => "Some of encoded parameters are too long or too short",
        Error::VerifyMismatch => "The password does not match the supplied hash",
    }
}
