//! Error type shared by every search component.

use thiserror::Error;

/// Failure of a search call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A parameter, configuration value or mask did not validate.
    ///
    /// Raised before any search state is created.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A parallel worker aborted before producing its result.
    #[error("compute failure: {0}")]
    ComputeFailure(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

pub(crate) fn invalid<T>(msg: impl Into<String>) -> Result<T> {
    Err(SearchError::InvalidInput(msg.into()))
}
