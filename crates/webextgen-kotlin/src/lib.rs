//! webextgen-kotlin - Kotlin/JS declarations for extension APIs
//!
//! This crate renders a [`ResolvedApi`](webextgen_schema::ResolvedApi) as
//! Kotlin/JS `external` declarations:
//! - [`generate`] renders every file in memory
//! - [`write_files`] replaces an output directory with the rendered files
//!
//! # Output
//!
//! | File | Contents |
//! |------|----------|
//! | `<group>.kt` | `<Path>Namespace` interfaces of a top-level group and its types |
//! | `Browser.kt` | `ExtensionEvent<in T>`, `Browser`, `external val browser` |
//!
//! # Example
//!
//! ```
//! use webextgen_kotlin::{EmitOptions, generate};
//! use webextgen_schema::{parse_document, resolve_api};
//!
//! let document = r#"[{"namespace": "alarms", "functions": [{"name": "clearAll", "async": true}]}]"#;
//! let api = resolve_api(parse_document("alarms.json", document)?)?;
//!
//! let files = generate(&api, &EmitOptions::default())?;
//! assert!(files[0].content.contains("fun clearAll(): Promise<Any?>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod emit;
mod error;
mod keywords;
mod output;

pub mod printer;
pub mod types;

pub use emit::{BROWSER_FILE, EmitOptions, generate, namespace_interface_name};
pub use error::{EmitError, EmitResult};
pub use keywords::{escape_identifier, is_keyword};
pub use output::{GeneratedFile, write_files};
