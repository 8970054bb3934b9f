//! webextgen-schema - Schema model, merging and resolution
//!
//! This crate turns browser extension namespace-schema documents into a
//! resolved API model:
//! - [`model`]: the document data structures and the closed [`Shape`] sum type
//! - [`merge`]: folding namespace and type fragments into canonical definitions
//! - [`TypeRegistry`]: every named type, declared or synthesized
//! - [`resolve`]: naming inline objects and unions
//! - [`overload`]: expanding choice parameters into concrete signatures
//! - [`resolve_api`]: the whole pipeline
//!
//! # Example
//!
//! ```
//! use webextgen_schema::{parse_document, resolve_api};
//!
//! let document = r#"[{
//!     "namespace": "alarms",
//!     "functions": [{
//!         "name": "create",
//!         "parameters": [{
//!             "name": "alarmInfo",
//!             "type": "object",
//!             "properties": {"when": {"type": "number", "optional": true}}
//!         }]
//!     }]
//! }]"#;
//!
//! let api = resolve_api(parse_document("alarms.json", document)?)?;
//! assert!(api.registry.contains("AlarmInfo"));
//! # Ok::<(), webextgen_schema::SchemaError>(())
//! ```

mod document;
mod error;
mod pipeline;

pub mod merge;
pub mod model;
pub mod naming;
pub mod overload;
pub mod registry;
pub mod resolve;

pub use document::parse_document;
pub use error::{SchemaError, SchemaResult};
pub use model::{
    AsyncMode, EnumValue, Event, Function, Namespace, Parameter, Primitive, Shape, TypeDef, TypeTag,
};
pub use overload::{ReturnType, Signature, expand};
pub use pipeline::{ResolvedApi, resolve_api};
pub use registry::{RegisteredType, TypeOrigin, TypeRegistry};
pub use resolve::{ResolveMode, Resolver};
