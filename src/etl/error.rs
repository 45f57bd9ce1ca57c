//! Pipeline errors

use super::ValidationError;
use crate::store::StoreError;
use thiserror::Error;

/// Failure of one ETL cycle
///
/// None of these are recovered from: the cycle aborts and the poller stops.
#[derive(Debug, Error)]
pub enum EtlError {
    /// Network error, non-2xx status or unreadable body
    #[error("extract failed: {0}")]
    Extract(#[from] reqwest::Error),
    /// Payload did not have the expected shape
    #[error("transform failed: {0}")]
    Validation(#[from] ValidationError),
    /// Insert or commit failed
    #[error("load failed: {0}")]
    Load(#[from] StoreError),
}
