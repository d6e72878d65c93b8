//! Global error handling for itemview
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

use crate::clipboard::ClipboardError;
use crate::icon::IconError;

/// Global error type for itemview operations
#[derive(Error, Debug)]
pub enum ItemViewError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Input file does not exist
    #[error("The selected file '{0}' was not found")]
    FileNotFound(String),

    /// XML syntax or structure errors
    #[error("Error loading or parsing XML file: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Export bytes that cannot be decoded as text
    #[error("Error loading or parsing XML file: {0}")]
    MalformedDocument(String),

    /// Icon decoding or saving errors
    #[error("Icon error: {0}")]
    Icon(#[from] IconError),

    /// No usable item matches the requested key
    #[error("No item matching '{0}'")]
    ItemNotFound(String),

    /// SQL export errors
    #[error("An error occurred during export: {0}")]
    Export(String),

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Specialized Result type for itemview operations
pub type Result<T> = std::result::Result<T, ItemViewError>;

/// Creates an ItemViewError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ItemViewError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}
