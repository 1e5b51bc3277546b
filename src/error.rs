//! # Error Types
//!
//! This module defines error types used throughout the lnpdf library.
//!
//! Two variants are recoverable at the text element boundary:
//! [`LnPdfError::UnrecognizedCommand`] and [`LnPdfError::MalformedInterval`].
//! The converter skips the offending text element and keeps going. Everything
//! else aborts the document.

use thiserror::Error;

/// Main error type for lnpdf operations
#[derive(Debug, Error)]
pub enum LnPdfError {
    /// Style record with a command token outside the known vocabulary
    #[error("Unrecognized style command: {0}")]
    UnrecognizedCommand(String),

    /// Style record with missing or non-numeric fields
    #[error("Malformed style interval: {0}")]
    MalformedInterval(String),

    /// Location is not a notebook/board, or notebook metadata is incomplete
    #[error("Notebook error: {0}")]
    Notebook(String),

    /// XML parse error in notebook metadata
    #[error("XML error: {0}")]
    Xml(String),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LnPdfError {
    /// Whether this error only invalidates a single text element.
    pub fn is_element_local(&self) -> bool {
        matches!(
            self,
            LnPdfError::UnrecognizedCommand(_) | LnPdfError::MalformedInterval(_)
        )
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, LnPdfError>;
