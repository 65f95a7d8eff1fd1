//! Device layer error types.

use thiserror::Error;

use hid_magtek_protocol::ParseError;

#[derive(Debug, Error)]
pub enum Error {
    /// The device processed the request and reported failure.
    #[error("device reported failure (result code {0:#04x})")]
    Failed(u8),

    /// The device rejected a request parameter. Points at a driver bug
    /// rather than a device condition.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("device not found: {0}")]
    NotFound(String),

    #[error("device is not open")]
    NotOpen,

    #[error("HID write failed: {0}")]
    WriteFailed(String),

    #[error("HID read failed: {0}")]
    ReadFailed(String),

    #[error("input report read failed: {0}")]
    ReportFailed(String),

    /// The device is busy completing a previous request. Not a failure:
    /// retry the same request after a short wait.
    #[error("device busy, retry the request later")]
    Delayed,

    /// The request is not permitted in the reader's current security state.
    #[error("request not permitted in the current reader state")]
    InvalidOperation,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    #[error("timed out waiting for the device")]
    TimedOut,

    #[error(transparent)]
    Descriptor(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
