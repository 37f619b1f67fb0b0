//! Error types for map grid operations

use thiserror::Error;

/// Map grid error type.
///
/// All variants are programming errors of the caller; none of them is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A coordinate lies outside the grid
    #[error("square ({x}, {y}) is outside of the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// A transaction was used from a thread other than the one that opened it
    #[error("a transaction must only be used by one thread")]
    ForeignThread,

    /// `end_transaction` without a matching `begin_transaction`
    #[error("tried to end a transaction but no transaction was open")]
    NoTransaction,
}

/// Result type for map grid operations
pub type Result<T> = std::result::Result<T, GridError>;
