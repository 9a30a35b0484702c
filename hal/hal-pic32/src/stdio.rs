//! Standard stream redirection hooks
//!
//! Redirecting `stdout`/`stderr` to a UART is not available on this
//! platform. A non-positive UART number means "leave the stream alone" and
//! always succeeds; any real UART number fails permanently.

use core::fmt;

use log::warn;
use thiserror::Error;

/// Standard output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => write!(f, "stdout"),
            Stream::Stderr => write!(f, "stderr"),
        }
    }
}

/// Redirection failure. Not transient; retrying cannot succeed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectError {
    #[error("cannot redirect {stream} to UART{uart}")]
    UartFailed { stream: Stream, uart: i32 },
}

/// Point `stream` at UART `uart_no`, or leave it as is for `uart_no <= 0`.
pub fn redirect(stream: Stream, uart_no: i32) -> Result<(), RedirectError> {
    if uart_no <= 0 {
        return Ok(());
    }
    warn!("{} redirection to UART{} is not supported", stream, uart_no);
    Err(RedirectError::UartFailed {
        stream,
        uart: uart_no,
    })
}

pub fn set_stdout_uart(uart_no: i32) -> Result<(), RedirectError> {
    redirect(Stream::Stdout, uart_no)
}

pub fn set_stderr_uart(uart_no: i32) -> Result<(), RedirectError> {
    redirect(Stream::Stderr, uart_no)
}
