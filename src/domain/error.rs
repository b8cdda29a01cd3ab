//! Failures raised by record store backends.

use thiserror::Error;

/// Unexpected backend fault.
///
/// Expected conditions (unknown key, URL already shortened) are reported as
/// typed outcomes, never as a `StoreError`. Stores do not retry.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The generated key is already taken by another record.
    #[error("short key {0} is already taken")]
    DuplicateKey(String),

    /// A uniqueness violation was reported but the conflicting row could not be found.
    #[error("conflicting record for {0} is missing")]
    MissingConflict(String),
}
