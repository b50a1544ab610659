//! Result codes and the failure type shared by every operation.
//!
//! The protocol engine reports every outcome as a numeric result code. Two of
//! those codes are flow-control sentinels rather than failures: `Ok` means
//! proceed, `LastCall` means a result stream ended cleanly. Everything else
//! is a failure kind, and every fallible operation in this crate surfaces
//! exactly one of them wrapped in a [`ProtocolError`] naming the operation
//! that produced it. Callers are expected to branch on the code, not on the
//! message text.

use thiserror::Error;

/// Result codes understood by the handle layer.
///
/// The numeric values are the engine's wire values; [`ErrorCode::System`]
/// carries an environment-level code that falls outside the protocol set
/// (the engine reports some local failures, e.g. from `find_scopes`, this
/// way).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Ok,
    LastCall,
    LanguageNotSupported,
    ParseError,
    InvalidRegistration,
    ScopeNotSupported,
    AuthenticationAbsent,
    AuthenticationFailed,
    InvalidUpdate,
    RefreshRejected,
    NotImplemented,
    BufferOverflow,
    NetworkTimedOut,
    NetworkInitFailed,
    MemoryAllocFailed,
    ParameterBad,
    NetworkError,
    InternalSystemError,
    HandleInUse,
    TypeError,
    System(i32),
}

impl ErrorCode {
    /// Numeric wire value of this code.
    pub fn value(&self) -> i32 {
        match self {
            ErrorCode::Ok => 0,
            ErrorCode::LastCall => 1,
            ErrorCode::LanguageNotSupported => -1,
            ErrorCode::ParseError => -2,
            ErrorCode::InvalidRegistration => -3,
            ErrorCode::ScopeNotSupported => -4,
            ErrorCode::AuthenticationAbsent => -6,
            ErrorCode::AuthenticationFailed => -7,
            ErrorCode::InvalidUpdate => -13,
            ErrorCode::RefreshRejected => -15,
            ErrorCode::NotImplemented => -17,
            ErrorCode::BufferOverflow => -18,
            ErrorCode::NetworkTimedOut => -19,
            ErrorCode::NetworkInitFailed => -20,
            ErrorCode::MemoryAllocFailed => -21,
            ErrorCode::ParameterBad => -22,
            ErrorCode::NetworkError => -23,
            ErrorCode::InternalSystemError => -24,
            ErrorCode::HandleInUse => -25,
            ErrorCode::TypeError => -26,
            ErrorCode::System(raw) => *raw,
        }
    }

    /// Maps a numeric code back into the enumeration. Values outside the
    /// protocol set are preserved as [`ErrorCode::System`].
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => ErrorCode::Ok,
            1 => ErrorCode::LastCall,
            -1 => ErrorCode::LanguageNotSupported,
            -2 => ErrorCode::ParseError,
            -3 => ErrorCode::InvalidRegistration,
            -4 => ErrorCode::ScopeNotSupported,
            -6 => ErrorCode::AuthenticationAbsent,
            -7 => ErrorCode::AuthenticationFailed,
            -13 => ErrorCode::InvalidUpdate,
            -15 => ErrorCode::RefreshRejected,
            -17 => ErrorCode::NotImplemented,
            -18 => ErrorCode::BufferOverflow,
            -19 => ErrorCode::NetworkTimedOut,
            -20 => ErrorCode::NetworkInitFailed,
            -21 => ErrorCode::MemoryAllocFailed,
            -22 => ErrorCode::ParameterBad,
            -23 => ErrorCode::NetworkError,
            -24 => ErrorCode::InternalSystemError,
            -25 => ErrorCode::HandleInUse,
            -26 => ErrorCode::TypeError,
            other => ErrorCode::System(other),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ErrorCode::Ok)
    }

    pub fn is_last_call(&self) -> bool {
        matches!(self, ErrorCode::LastCall)
    }

    /// True for every code that must be surfaced to the caller as an error.
    pub fn is_failure(&self) -> bool {
        !self.is_ok() && !self.is_last_call()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCode::Ok => "ok",
            ErrorCode::LastCall => "last call",
            ErrorCode::LanguageNotSupported => "language not supported",
            ErrorCode::ParseError => "parse error",
            ErrorCode::InvalidRegistration => "invalid registration",
            ErrorCode::ScopeNotSupported => "scope not supported",
            ErrorCode::AuthenticationAbsent => "authentication absent",
            ErrorCode::AuthenticationFailed => "authentication failed",
            ErrorCode::InvalidUpdate => "invalid update",
            ErrorCode::RefreshRejected => "refresh rejected",
            ErrorCode::NotImplemented => "not implemented",
            ErrorCode::BufferOverflow => "buffer overflow",
            ErrorCode::NetworkTimedOut => "network timed out",
            ErrorCode::NetworkInitFailed => "network init failed",
            ErrorCode::MemoryAllocFailed => "memory allocation failed",
            ErrorCode::ParameterBad => "bad parameter",
            ErrorCode::NetworkError => "network error",
            ErrorCode::InternalSystemError => "internal system error",
            ErrorCode::HandleInUse => "handle in use",
            ErrorCode::TypeError => "type error",
            ErrorCode::System(_) => "system error",
        };
        write!(f, "{name} ({})", self.value())
    }
}

/// Failure raised by any handle-layer operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{op}]: {code}")]
pub struct ProtocolError {
    /// Which failure kind the engine (or the collector) reported.
    pub code: ErrorCode,
    /// The operation that produced it.
    pub op: &'static str,
}

impl ProtocolError {
    pub fn new(code: ErrorCode, op: &'static str) -> Self {
        Self { code, op }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}
