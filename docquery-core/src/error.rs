// src/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocQueryError {
    /// A named field was written below an array.
    #[error("can't append to array using string field name `{segment}`")]
    ArrayAppend { segment: String },

    /// A write targeted an index too far past the end of an array.
    #[error("array index {segment} is out of range for array of length {len}")]
    ArrayIndexOutOfRange { segment: String, len: usize },

    /// A write tried to descend into a string, number, boolean or null.
    #[error("cannot set `{segment}`: path only supports object not {type_name}")]
    ScalarParent {
        type_name: &'static str,
        segment: String,
    },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    #[error("Update operator '{0}' is not implemented")]
    NotImplemented(String),
}

impl DocQueryError {
    /// Errors raised because a path cannot be materialized in the document.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DocQueryError::ArrayAppend { .. }
                | DocQueryError::ArrayIndexOutOfRange { .. }
                | DocQueryError::ScalarParent { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DocQueryError>;
