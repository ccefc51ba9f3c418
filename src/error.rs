use std::collections::TryReserveError;

use thiserror::Error;

/// Errors returned by map operations.
///
/// Duplicate keys on insert and missing keys on removal are not errors;
/// they are reported through `bool` and `Option` return values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Storage for a new tree node could not be allocated.
    #[error("failed to allocate tree node: {0}")]
    AllocationFailure(#[from] TryReserveError),
}

pub type Result<T> = std::result::Result<T, Error>;
