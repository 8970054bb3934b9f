//! Parsing of schema documents.

use crate::error::{SchemaError, SchemaResult};
use crate::model::Namespace;

/// Parse one schema document into its namespace fragments.
///
/// Lines starting with `//` (license headers) are dropped before parsing.
/// `document` names the source in error messages.
pub fn parse_document(document: &str, text: &str) -> SchemaResult<Vec<Namespace>> {
    let json = strip_line_comments(text);

    serde_json::from_str(&json).map_err(|source| SchemaError::Parse {
        document: document.to_string(),
        source,
    })
}

fn strip_line_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}
