//! Error types for declaration emission.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for emission.
pub type EmitResult<T> = Result<T, EmitError>;

/// Errors that can occur while rendering or writing declarations.
#[derive(Debug, Error)]
pub enum EmitError {
    /// I/O error while replacing the output directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output directory cannot be safely deleted and recreated.
    #[error("refusing to clear output directory {path:?}")]
    UnsafeOutputPath { path: PathBuf },

    /// The resolved model cannot be rendered.
    #[error("schema error: {0}")]
    Schema(#[from] webextgen_schema::SchemaError),
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn EmitError___unsafe_output_path___names_path() {
        let err = EmitError::UnsafeOutputPath { path: PathBuf::from("/") };

        assert_eq!(err.to_string(), "refusing to clear output directory \"/\"");
    }

    #[test]
    fn EmitError___from_io___wraps_source() {
        let err: EmitError = std::io::Error::other("disk full").into();

        assert!(matches!(err, EmitError::Io(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
