//! Error types for Wordshape

// this_file: crates/wordshape-core/src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShapeError>;

/// Main error type for the shaping crates
///
/// Nothing here is fatal to a hosting process: empty shaping output is
/// recovered as zero width at the call site and never reaches this
/// enum. What does reach it is caller contract violations and backend
/// failures.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("invalid character range {from}..{to} for a run of length {len}")]
    InvalidRange { from: usize, to: usize, len: usize },

    #[error("shaping backend error: {0}")]
    Backend(String),
}

impl ShapeError {
    /// Check a `[from, to)` query range against a run length
    pub fn check_range(from: usize, to: usize, len: usize) -> Result<()> {
        if from > to || to > len {
            return Err(ShapeError::InvalidRange { from, to, len });
        }
        Ok(())
    }
}
