//! Error types for option validation and integer code decoding.

use thiserror::Error;

/// Errors from validating [`ConvertOptions`](crate::ConvertOptions).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    /// Shape precision outside the unit interval.
    #[error("shaped_mask_precision must be in [0, 1], got {0}")]
    InvalidPrecision(f64),

    /// Worker count of zero.
    #[error("jobs must be at least 1")]
    NoWorkers,
}

/// An integer code that does not name any variant of a coded enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCode {
    /// Name of the enum being decoded.
    pub kind: &'static str,
    /// The offending code.
    pub code: u8,
}
