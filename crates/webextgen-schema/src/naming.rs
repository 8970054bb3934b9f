//! Naming convention utilities shared by the resolver and the emitters.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `word` | [`capitalize`] | `Word` |
//! | `dotted.name` / `snake_case` | [`to_pascal_case`] | `DottedName` |
//! | `namespace.Type` | [`simple_name`] | `Type` |

/// Capitalize the first letter of a string.
///
/// # Examples
///
/// ```
/// use webextgen_schema::naming::capitalize;
///
/// assert_eq!(capitalize("options"), "Options");
/// assert_eq!(capitalize("queryInfo"), "QueryInfo");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Convert a dotted, kebab or snake identifier to PascalCase.
///
/// # Examples
///
/// ```
/// use webextgen_schema::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("devtools.panels"), "DevtoolsPanels");
/// assert_eq!(to_pascal_case("browser_action"), "BrowserAction");
/// assert_eq!(to_pascal_case("alarms"), "Alarms");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(['.', '-', '_']).map(capitalize).collect()
}

/// Strip a namespace qualifier from a type reference.
///
/// # Examples
///
/// ```
/// use webextgen_schema::naming::simple_name;
///
/// assert_eq!(simple_name("tabs.Tab"), "Tab");
/// assert_eq!(simple_name("Tab"), "Tab");
/// ```
pub fn simple_name(reference: &str) -> &str {
    reference
        .rsplit_once('.')
        .map_or(reference, |(_, name)| name)
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn capitalize___capitalizes_first_letter() {
        assert_eq!(capitalize("details"), "Details");
        assert_eq!(capitalize("a"), "A");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn capitalize___preserves_rest_of_string() {
        assert_eq!(capitalize("createProperties"), "CreateProperties");
        assert_eq!(capitalize("URL"), "URL");
    }

    #[test]
    fn to_pascal_case___converts_dotted_paths() {
        assert_eq!(to_pascal_case("devtools.inspectedWindow"), "DevtoolsInspectedWindow");
        assert_eq!(to_pascal_case("a.b.c"), "ABC");
    }

    #[test]
    fn to_pascal_case___converts_snake_and_kebab_case() {
        assert_eq!(to_pascal_case("page_action"), "PageAction");
        assert_eq!(to_pascal_case("content-scripts"), "ContentScripts");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn simple_name___strips_qualifier() {
        assert_eq!(simple_name("manifest.WebExtensionManifest"), "WebExtensionManifest");
        assert_eq!(simple_name("extensionTypes.ImageDetails"), "ImageDetails");
    }

    #[test]
    fn simple_name___unqualified___unchanged() {
        assert_eq!(simple_name("Port"), "Port");
    }
}
