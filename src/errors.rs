//! Error Module
//!
//! Provides the error vocabulary for the library: a closed set of high-level
//! error classifications paired with the raw diagnostic code reported by the
//! underlying socket API. This module never fails itself.

use std::fmt;
use std::io;

/// High-level error classification
///
/// Every fallible operation in the library reports exactly one of these
/// codes. `WouldBlock` is the sole non-fatal classification: it signals that
/// a non-blocking operation has nothing to do right now and the caller is
/// expected to poll again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Success sentinel
    None,
    /// Failed to initialize the socket API
    ApiInitialization,
    /// Failed to create a socket
    SocketCreation,
    /// Failed to configure a dual-stack IPv6 socket
    DualStackUnavailable,
    /// Failed to switch the socket mode
    ModeConfiguration,
    /// Failed to bind the socket
    Bind,
    /// Failed to query the local socket address
    AddressQuery,
    /// Failed to send data
    Send,
    /// Failed to receive data
    Recv,
    /// Nothing to do right now (non-blocking operation)
    WouldBlock,
    /// Failed to convert between address text and address bytes
    AddressConversion,
}

impl ErrorCode {
    /// Human-readable description of the error code
    ///
    /// The returned text is stable and suitable for display to users.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::None => "no error",
            ErrorCode::ApiInitialization => "failed to initialize socket API",
            ErrorCode::SocketCreation => "failed to create socket",
            ErrorCode::DualStackUnavailable => "failed to create dual-stack IPV6 socket",
            ErrorCode::ModeConfiguration => "failed to set socket mode",
            ErrorCode::Bind => "failed to bind socket to specified address",
            ErrorCode::AddressQuery => "failed to query socket address",
            ErrorCode::Send => "failed to send data",
            ErrorCode::Recv => "failed to receive data",
            ErrorCode::WouldBlock => "no data received at the time",
            ErrorCode::AddressConversion => "failed to convert string to address",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Structured error
///
/// Pairs the library's coarse classification with the unmodified diagnostic
/// code of the underlying socket API, so callers can inspect or log the
/// native failure reason. The native code is meaningful only when `code` is
/// not [`ErrorCode::None`]; the success sentinel always carries 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{code} (underlying error {underlying_code})")]
pub struct Error {
    /// Library error classification
    pub code: ErrorCode,
    /// Raw diagnostic reported by the underlying socket API, 0 if none
    pub underlying_code: i32,
}

impl Error {
    /// Create an error from a classification and a raw diagnostic code
    pub fn new(code: ErrorCode, underlying_code: i32) -> Self {
        Self {
            code,
            underlying_code,
        }
    }

    /// Create an error which signals success
    pub fn success() -> Self {
        Self {
            code: ErrorCode::None,
            underlying_code: 0,
        }
    }

    /// Create an error from an I/O error, preserving the OS diagnostic
    ///
    /// The raw OS error code is captured when present; synthetic I/O errors
    /// without one are recorded with a diagnostic of 0.
    pub fn from_io(code: ErrorCode, err: &io::Error) -> Self {
        Self {
            code,
            underlying_code: err.raw_os_error().unwrap_or(0),
        }
    }

    /// Human-readable description of the error classification
    pub fn description(&self) -> &'static str {
        self.code.description()
    }
}

// Comparison against a bare code for quality-of-life.
impl PartialEq<ErrorCode> for Error {
    fn eq(&self, other: &ErrorCode) -> bool {
        self.code == *other
    }
}

impl PartialEq<Error> for ErrorCode {
    fn eq(&self, other: &Error) -> bool {
        *self == other.code
    }
}
