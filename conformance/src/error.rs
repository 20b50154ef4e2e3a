//! Typed errors for the operations whose callers branch on the failure kind.

use thiserror::Error;

/// Why a reachability probe did not produce an HTTP status.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// The request did not complete within the probe timeout.
    #[error("timed out")]
    Timeout,
    /// Connection refused, DNS failure, TLS error, and similar.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Why a malformed manifest could not be repaired.
#[derive(Debug, Error)]
pub enum RepairError {
    /// The patched text still does not parse as JSON.
    #[error("patched manifest is still invalid JSON: {0}")]
    StillInvalid(#[from] serde_json::Error),
    /// The patched text parses but its root is not an array.
    #[error("patched manifest root is not an array")]
    NotAnArray,
}
