//! A small Kotlin declaration model and its pretty-printer.
//!
//! The emitter builds [`KotlinFile`]s out of interfaces, type aliases and
//! top-level properties; [`KotlinFile::render`] turns them into source text.
//! Only the subset of Kotlin needed for `external` declarations is modelled.
//!
//! # Layout
//!
//! ```text
//! package webextensions
//!
//! /**
//!  * Details about an alarm.
//!  */
//! external interface Alarm {
//!     var name: String
//!     var periodInMinutes: Double?
//! }
//! ```

use std::fmt;

const INDENT: &str = "    ";

/// A Kotlin type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    /// A plain or already-escaped type name (`String`, `Tab`, `Json`).
    Simple(String),
    /// `Name<A, B>`.
    Generic { name: String, arguments: Vec<TypeName> },
    /// `(a: A, b: B) -> R`.
    Lambda {
        parameters: Vec<(String, TypeName)>,
        returns: Box<TypeName>,
    },
    /// `T?`.
    Nullable(Box<TypeName>),
}

impl TypeName {
    pub fn simple(name: impl Into<String>) -> Self {
        TypeName::Simple(name.into())
    }

    pub fn generic(name: impl Into<String>, arguments: Vec<TypeName>) -> Self {
        TypeName::Generic {
            name: name.into(),
            arguments,
        }
    }

    pub fn unit() -> Self {
        TypeName::simple("Unit")
    }

    /// `Any?`, the type of values the schema does not describe.
    pub fn any() -> Self {
        TypeName::simple("Any").nullable()
    }

    /// This type made nullable; nullable types are returned unchanged.
    pub fn nullable(self) -> Self {
        match self {
            TypeName::Nullable(_) => self,
            other => TypeName::Nullable(Box::new(other)),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Simple(name) => write!(f, "{name}"),
            TypeName::Generic { name, arguments } => {
                write!(f, "{name}<")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ">")
            }
            TypeName::Lambda { parameters, returns } => {
                write!(f, "(")?;
                for (i, (name, ty)) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                write!(f, ") -> {returns}")
            }
            TypeName::Nullable(inner) => match inner.as_ref() {
                TypeName::Lambda { .. } => write!(f, "({inner})?"),
                _ => write!(f, "{inner}?"),
            },
        }
    }
}

/// One source file.
#[derive(Debug, Clone, PartialEq)]
pub struct KotlinFile {
    pub package: String,
    pub declarations: Vec<Declaration>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Interface(InterfaceSpec),
    TypeAlias(TypeAliasSpec),
    /// `external val name: Type`.
    Property(PropertySpec),
}

/// An `external interface`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceSpec {
    pub name: String,
    /// Type parameters with variance, e.g. `in T`.
    pub type_parameters: Vec<String>,
    pub docs: Vec<String>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Property(PropertySpec),
    Function(FunctionSpec),
    /// `@nativeGetter`/`@nativeSetter` operator pair of an open map.
    IndexSignature { key: TypeName, value: TypeName },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    pub name: String,
    pub ty: TypeName,
    pub mutable: bool,
    pub docs: Vec<String>,
    pub deprecated: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSpec {
    pub name: String,
    pub docs: Vec<String>,
    pub parameters: Vec<ParameterSpec>,
    /// `None` for `Unit`.
    pub returns: Option<TypeName>,
    pub deprecated: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub ty: TypeName,
    /// Render `= definedExternally`.
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasSpec {
    pub name: String,
    pub docs: Vec<String>,
    pub target: TypeName,
}

impl KotlinFile {
    /// Render the file to Kotlin source.
    pub fn render(&self) -> String {
        let mut code = String::new();

        code.push_str("@file:Suppress(\"unused\", \"UNUSED_PARAMETER\")\n\n");
        code.push_str(&format!("package {}\n", self.package));

        for declaration in &self.declarations {
            code.push('\n');
            match declaration {
                Declaration::Interface(interface) => render_interface(&mut code, interface),
                Declaration::TypeAlias(alias) => {
                    push_docs(&mut code, "", &alias.docs);
                    code.push_str(&format!("typealias {} = {}\n", alias.name, alias.target));
                }
                Declaration::Property(property) => {
                    push_docs(&mut code, "", &property.docs);
                    push_deprecated(&mut code, "", property.deprecated.as_deref());
                    let keyword = if property.mutable { "var" } else { "val" };
                    code.push_str(&format!(
                        "external {} {}: {}\n",
                        keyword, property.name, property.ty
                    ));
                }
            }
        }

        code
    }
}

fn render_interface(code: &mut String, interface: &InterfaceSpec) {
    push_docs(code, "", &interface.docs);

    code.push_str("external interface ");
    code.push_str(&interface.name);
    if !interface.type_parameters.is_empty() {
        code.push_str(&format!("<{}>", interface.type_parameters.join(", ")));
    }

    if interface.members.is_empty() {
        code.push('\n');
        return;
    }

    code.push_str(" {\n");
    for (i, member) in interface.members.iter().enumerate() {
        if i > 0 && member_has_docs(member) {
            code.push('\n');
        }
        render_member(code, member);
    }
    code.push_str("}\n");
}

fn member_has_docs(member: &Member) -> bool {
    match member {
        Member::Property(property) => !property.docs.is_empty(),
        Member::Function(function) => !function.docs.is_empty(),
        Member::IndexSignature { .. } => true,
    }
}

fn render_member(code: &mut String, member: &Member) {
    match member {
        Member::Property(property) => {
            push_docs(code, INDENT, &property.docs);
            push_deprecated(code, INDENT, property.deprecated.as_deref());
            let keyword = if property.mutable { "var" } else { "val" };
            code.push_str(&format!(
                "{INDENT}{} {}: {}\n",
                keyword, property.name, property.ty
            ));
        }
        Member::Function(function) => {
            push_docs(code, INDENT, &function.docs);
            push_deprecated(code, INDENT, function.deprecated.as_deref());
            code.push_str(&format!("{INDENT}fun {}(", function.name));
            for (i, parameter) in function.parameters.iter().enumerate() {
                if i > 0 {
                    code.push_str(", ");
                }
                code.push_str(&format!("{}: {}", parameter.name, parameter.ty));
                if parameter.optional {
                    code.push_str(" = definedExternally");
                }
            }
            code.push(')');
            if let Some(returns) = &function.returns {
                code.push_str(&format!(": {returns}"));
            }
            code.push('\n');
        }
        Member::IndexSignature { key, value } => {
            let value = value.clone().nullable();
            code.push_str(&format!("{INDENT}@nativeGetter\n"));
            code.push_str(&format!("{INDENT}operator fun get(key: {key}): {value}\n"));
            code.push_str(&format!("{INDENT}@nativeSetter\n"));
            code.push_str(&format!("{INDENT}operator fun set(key: {key}, value: {value})\n"));
        }
    }
}

/// Write a KDoc block.
///
/// Kotlin block comments nest, so both `/*` and `*/` in the text are defused.
fn push_docs(code: &mut String, indent: &str, docs: &[String]) {
    let lines: Vec<&str> = docs
        .iter()
        .flat_map(|doc| {
            if doc.is_empty() {
                vec![""]
            } else {
                doc.lines().collect()
            }
        })
        .map(str::trim_end)
        .collect();
    if lines.iter().all(|line| line.trim().is_empty()) {
        return;
    }

    code.push_str(&format!("{indent}/**\n"));
    for line in lines {
        let line = line.replace("*/", "*&#47;").replace("/*", "/&#42;");
        if line.is_empty() {
            code.push_str(&format!("{indent} *\n"));
        } else {
            code.push_str(&format!("{indent} * {line}\n"));
        }
    }
    code.push_str(&format!("{indent} */\n"));
}

fn push_deprecated(code: &mut String, indent: &str, message: Option<&str>) {
    if let Some(message) = message {
        code.push_str(&format!(
            "{indent}@Deprecated(\"{}\")\n",
            escape_string_literal(message)
        ));
    }
}

/// Escape text for a Kotlin string literal.
pub fn escape_string_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '$' => escaped.push_str("\\$"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}
