//! Error types for pagenav operations.
//!
//! The restructuring pass itself cannot fail; errors come from reading and
//! writing documents and from user-supplied selectors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("invalid class name `{0}`: must be a single non-empty token")]
    ClassName(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
