//! Pipeline error types
//!
//! Every failure in the load pipeline ends up here, and every one of them is
//! surfaced to the user only through its message.

use thiserror::Error;

/// Errors that can occur while loading chart data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Named table does not exist on the server
    #[error("Table not found: {0}")]
    Lookup(String),

    /// A remote command reported an error
    #[error("Execution error: {0}")]
    Execution(String),

    /// The server answered with something the pipeline cannot use
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Connection-level failure
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias for pipeline operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Illegal load status transition
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Load already started")]
    AlreadyStarted,

    #[error("Load has not started")]
    NotStarted,

    #[error("Load already settled")]
    AlreadySettled,

    #[error("A load can only settle as loaded or failed")]
    NotTerminal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::Lookup("prices".to_string());
        assert_eq!(err.to_string(), "Table not found: prices");

        let err = LoadError::Execution("SyntaxError: bad input".to_string());
        assert_eq!(err.to_string(), "Execution error: SyntaxError: bad input");
    }
}
