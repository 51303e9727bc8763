//! Error codes returned by fallible HIL and capsule operations.
//!
//! Mirrors `kernel::ErrorCode` as used throughout Tock's capsules: a small,
//! `Copy` enum rather than a boxed/allocating error type, since these values
//! cross HIL trait boundaries on every fallible call.

/// Standard error codes shared by every fallible operation in this crate.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorCode {
    /// Generic failure condition, used when no more specific code applies.
    Fail,
    /// Underlying resource is currently busy with another operation.
    Busy,
    /// Operation is already in progress or already in the requested state.
    Already,
    /// Resource is powered down or otherwise disabled.
    Off,
    /// Buffer or value provided is the wrong size.
    Size,
    /// Argument was invalid.
    Inval,
    /// Operation is not supported by this implementation.
    NoSupport,
    /// Out of memory / fixed-capacity table is full.
    NoMem,
    /// No such device, pin, or socket exists.
    NoDevice,
    /// Operation was cancelled.
    Cancel,
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ErrorCode::Fail => "operation failed",
            ErrorCode::Busy => "resource busy",
            ErrorCode::Already => "already in that state",
            ErrorCode::Off => "resource is off",
            ErrorCode::Size => "wrong size",
            ErrorCode::Inval => "invalid argument",
            ErrorCode::NoSupport => "not supported",
            ErrorCode::NoMem => "out of capacity",
            ErrorCode::NoDevice => "no such device",
            ErrorCode::Cancel => "cancelled",
        };
        f.write_str(s)
    }
}

impl std::error::Error for ErrorCode {}

/// An [`ErrorCode`] paired with an optional human-readable message, the
/// replacement for the original firmware's `string_t *errormsg` out
/// parameter threaded through the command dispatch layer.
#[derive(Debug, Clone)]
pub struct CoreError {
    pub code: ErrorCode,
    pub message: Option<String>,
}

impl CoreError {
    pub fn new(code: ErrorCode) -> Self {
        CoreError {
            code,
            message: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        CoreError {
            code,
            message: Some(message.into()),
        }
    }
}

impl From<ErrorCode> for CoreError {
    fn from(code: ErrorCode) -> Self {
        CoreError::new(code)
    }
}

impl core::fmt::Display for CoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.message {
            Some(m) => write!(f, "{}: {}", self.code, m),
            None => write!(f, "{}", self.code),
        }
    }
}

impl std::error::Error for CoreError {}
