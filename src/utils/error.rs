// src/error.rs

use thiserror::Error;

/// The primary error type for all operations in the painting engine.
///
/// The per-sample stroke path never fails; errors only come out of
/// construction and explicit command arguments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaintError {
    /// An invalid argument was provided to a function.
    #[error("Invalid argument: {0}")]
    InvalidArg(String),
    /// The operation needs a layer but the stack is empty.
    #[error("No active layer")]
    NoActiveLayer,
    /// A brush handle does not refer to a live brush.
    #[error("Unknown brush: {0}")]
    UnknownBrush(usize),
    /// Occurs when image dimensions do not match the expected dimensions.
    #[error("Dimension mismatch: expected ({}, {}), but got ({}, {})", expected.0, expected.1, actual.0, actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// A specialized `Result` type for painting operations.
pub type Result<T> = std::result::Result<T, PaintError>;
