//! Probe error types.

/// Reason a buffer could not be probed.
///
/// Per-format decoders return this so callers can tell "not enough bytes"
/// apart from "bytes present but nonsensical". The public [`probe`](crate::probe)
/// entry point folds every variant into `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// Buffer ends before the field that was needed.
    #[error("insufficient data: needed {needed} bytes, have {available}")]
    Truncated {
        /// Minimum buffer length required to read the field.
        needed: usize,
        /// Actual buffer length.
        available: usize,
    },
    /// Header fields are present but invalid (zero size, bad segment length, ...).
    #[error("malformed header: {0}")]
    Malformed(&'static str),
    /// Container recognised but the sub-format is not decoded.
    #[error("unsupported variant: {0}")]
    Unsupported(&'static str),
}

/// Shorthand for per-format decoder results.
pub type ProbeResult<T> = Result<T, ProbeError>;
