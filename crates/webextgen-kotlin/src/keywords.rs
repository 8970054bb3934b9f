//! Kotlin identifier escaping.
//!
//! Schema names are the public contract of the generated declarations, so a
//! name that collides with a Kotlin keyword, or is not a plain identifier, is
//! wrapped in backticks rather than renamed.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Kotlin hard keywords; these can never be used as bare identifiers.
static HARD_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
        "interface", "is", "null", "object", "package", "return", "super", "this", "throw",
        "true", "try", "typealias", "typeof", "val", "var", "when", "while",
    ]
    .into_iter()
    .collect()
});

/// Whether `name` is a Kotlin hard keyword.
pub fn is_keyword(name: &str) -> bool {
    HARD_KEYWORDS.contains(name)
}

/// Quote `name` with backticks when it is a keyword or not a plain identifier.
///
/// # Examples
///
/// ```
/// use webextgen_kotlin::escape_identifier;
///
/// assert_eq!(escape_identifier("tabId"), "tabId");
/// assert_eq!(escape_identifier("in"), "`in`");
/// assert_eq!(escape_identifier("content-type"), "`content-type`");
/// ```
pub fn escape_identifier(name: &str) -> String {
    if is_plain_identifier(name) && !is_keyword(name) {
        name.to_string()
    } else {
        format!("`{name}`")
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
