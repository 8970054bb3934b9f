//! Error types for schema merging and resolution

use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Error type for schema operations
///
/// Every variant is fatal for a generation run. Unsupported members and empty
/// parameter lists are not errors and never surface here.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A `$extend` fragment targets a type id that no fragment declares
    #[error("dangling type extension: no type declares id `{target}`")]
    DanglingExtend { target: String },

    /// A declared type id is already registered
    #[error("duplicate type id `{id}`: name is already registered")]
    DuplicateTypeId { id: String },

    /// A concrete function parameter declares an empty `choices` list
    #[error("parameter `{parameter}` of `{function}` declares no choices")]
    EmptyChoices { function: String, parameter: String },

    /// A schema document could not be parsed
    #[error("failed to parse schema document `{document}`: {source}")]
    Parse {
        document: String,
        #[source]
        source: serde_json::Error,
    },
}
