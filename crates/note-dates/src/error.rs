//! Error types for note-dates operations.
//!
//! The heuristic normalizers never fail; only the strict field parsers and
//! LLM payload decoding report errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid note fields: {0}")]
    InvalidFields(String),
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
