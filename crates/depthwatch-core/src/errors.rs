//! Error taxonomy.
//!
//! Hard failures only: each variant indicates data corruption or a
//! programming defect upstream, never a recoverable gameplay condition.
//! Sensor absence, out-of-range candidates, and empty contact lists are
//! ordinary negative results, not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Lookup of an unknown identifier, or use of a reference whose target
    /// has become defunct.
    #[error("invalid entity reference: {0}")]
    InvalidReference(String),

    /// Malformed persisted state detected at load time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An internal contract was broken (e.g. re-entering `advance` mid-step).
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

pub type SimResult<T> = Result<T, SimError>;
