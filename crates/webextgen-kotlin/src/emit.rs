//! Conversion of a resolved API into Kotlin files.
//!
//! One file per top-level namespace group holds the group's namespace
//! interfaces and every registered type owned by a namespace of the group.
//! `Browser.kt` holds the shared event interface and the root `browser`
//! object exposing each group.

use crate::error::EmitResult;
use crate::keywords::escape_identifier;
use crate::output::GeneratedFile;
use crate::printer::{
    Declaration, FunctionSpec, InterfaceSpec, KotlinFile, Member, ParameterSpec, PropertySpec,
    TypeAliasSpec, TypeName,
};
use crate::types::{constant_type, field_type, kotlin_type, type_reference};
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use webextgen_schema::naming::{simple_name, to_pascal_case};
use webextgen_schema::{
    Event, Function, Namespace, Parameter, Primitive, RegisteredType, ResolvedApi, ReturnType,
    Shape, Signature, expand,
};

/// File holding the root declarations.
pub const BROWSER_FILE: &str = "Browser.kt";

/// Options for [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Kotlin package every file declares.
    pub package: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            package: "webextensions".to_string(),
        }
    }
}

/// Render every file for `api`, without touching the filesystem.
pub fn generate(api: &ResolvedApi, options: &EmitOptions) -> EmitResult<Vec<GeneratedFile>> {
    let groups = api.top_level_groups();
    let mut files = Vec::with_capacity(groups.len() + 1);

    for group in &groups {
        let file = group_file(api, group, &options.package)?;
        tracing::debug!(group = %group, declarations = file.declarations.len(), "Rendered group");
        files.push(GeneratedFile {
            path: PathBuf::from(format!("{group}.kt")),
            content: file.render(),
        });
    }

    files.push(GeneratedFile {
        path: PathBuf::from(BROWSER_FILE),
        content: browser_file(&groups, &options.package).render(),
    });

    tracing::info!(files = files.len(), package = %options.package, "Generated declarations");
    Ok(files)
}

/// Kotlin interface name for a dotted namespace path.
pub fn namespace_interface_name(path: &str) -> String {
    format!("{}Namespace", to_pascal_case(path))
}

fn group_file(api: &ResolvedApi, group: &str, package: &str) -> EmitResult<KotlinFile> {
    let records: Vec<&Namespace> = api.namespaces_in(group).collect();

    let mut paths = BTreeSet::new();
    for record in &records {
        let mut prefix = String::new();
        for segment in record.name.split('.') {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);
            paths.insert(prefix.clone());
        }
    }

    let mut declarations = Vec::new();

    for path in &paths {
        let record = records.iter().copied().find(|record| &record.name == path);
        let children = paths.iter().filter(|candidate| parent_path(candidate) == Some(path.as_str()));
        declarations.push(Declaration::Interface(namespace_interface(
            path, record, children,
        )?));
    }

    for (name, entry) in api.registry.iter() {
        if top_level(&entry.namespace) == group {
            declarations.push(type_declaration(name, entry)?);
        }
    }

    Ok(KotlinFile {
        package: package.to_string(),
        declarations,
    })
}

fn namespace_interface<'a>(
    path: &str,
    record: Option<&Namespace>,
    children: impl Iterator<Item = &'a String>,
) -> EmitResult<InterfaceSpec> {
    let mut members = Vec::new();

    for child in children {
        members.push(Member::Property(PropertySpec {
            name: escape_identifier(simple_name(child)),
            ty: TypeName::simple(namespace_interface_name(child)),
            mutable: false,
            docs: vec![],
            deprecated: None,
        }));
    }

    let Some(record) = record else {
        return Ok(InterfaceSpec {
            name: namespace_interface_name(path),
            members,
            ..InterfaceSpec::default()
        });
    };

    for (key, property) in &record.properties {
        members.push(Member::Property(PropertySpec {
            name: escape_identifier(key),
            ty: constant_type(property),
            mutable: false,
            docs: property.description.iter().cloned().collect(),
            deprecated: property.deprecated.clone(),
        }));
    }

    members.extend(record.events.iter().map(event_member));

    for function in &record.functions {
        members.extend(function_members(function)?);
    }

    Ok(InterfaceSpec {
        name: namespace_interface_name(path),
        type_parameters: vec![],
        docs: record.description.iter().cloned().collect(),
        members,
    })
}

/// One declaration for a registered type.
fn type_declaration(name: &str, entry: &RegisteredType) -> EmitResult<Declaration> {
    let def = &entry.def;
    let shape = &def.shape;
    let mut docs: Vec<String> = shape.description.iter().cloned().collect();

    let object_like = !def.functions.is_empty()
        || !def.events.is_empty()
        || matches!(shape.shape(), Shape::Object | Shape::Primitive(Primitive::Object));

    if object_like {
        let mut members = Vec::new();

        for (key, property) in shape.properties.iter().flatten() {
            members.push(Member::Property(PropertySpec {
                name: escape_identifier(key),
                ty: field_type(property),
                mutable: true,
                docs: property.description.iter().cloned().collect(),
                deprecated: property.deprecated.clone(),
            }));
        }

        if let Some(value) = index_value_type(shape) {
            members.push(Member::IndexSignature {
                key: TypeName::simple("String"),
                value,
            });
        }

        members.extend(def.events.iter().map(event_member));

        for function in &def.functions {
            members.extend(function_members(function)?);
        }

        return Ok(Declaration::Interface(InterfaceSpec {
            name: type_reference(name).to_string(),
            type_parameters: vec![],
            docs,
            members,
        }));
    }

    let target = match shape.shape() {
        Shape::Choice(choices) => {
            push_section(&mut docs, "Can be one of:");
            docs.extend(choices.iter().map(|choice| format!("- `{}`", kotlin_type(choice))));
            TypeName::simple("Any")
        }
        Shape::Primitive(Primitive::String) if shape.enumeration.is_some() => {
            push_section(&mut docs, "Allowed values:");
            for value in shape.enumeration.iter().flatten() {
                docs.push(format!("- `{}`", value.name()));
            }
            TypeName::simple("String")
        }
        _ => kotlin_type(shape),
    };

    Ok(Declaration::TypeAlias(TypeAliasSpec {
        name: type_reference(name).to_string(),
        docs,
        target,
    }))
}

/// Value type of an open map, from `additionalProperties` or `patternProperties`.
fn index_value_type(shape: &Parameter) -> Option<TypeName> {
    if let Some(values) = &shape.additional_properties {
        return Some(kotlin_type(values));
    }

    let patterns = shape.pattern_properties.as_ref()?;
    let distinct: BTreeSet<String> = patterns.values().map(|p| kotlin_type(p).to_string()).collect();
    match distinct.len() {
        0 => None,
        1 => patterns.values().next().map(kotlin_type),
        _ => Some(TypeName::any()),
    }
}

fn event_member(event: &Event) -> Member {
    let listener = TypeName::Lambda {
        parameters: event
            .parameters
            .iter()
            .enumerate()
            .map(|(position, parameter)| (parameter_name(parameter, position), field_type(parameter)))
            .collect(),
        returns: Box::new(TypeName::unit()),
    };

    Member::Property(PropertySpec {
        name: escape_identifier(&event.name),
        ty: TypeName::generic("ExtensionEvent", vec![listener]),
        mutable: false,
        docs: event.description.iter().cloned().collect(),
        deprecated: event.deprecated.clone(),
    })
}

/// Expanded signatures of `function`; identical parameter type lists are emitted once.
fn function_members(function: &Function) -> EmitResult<Vec<Member>> {
    let mut seen = HashSet::new();
    let mut members = Vec::new();

    for signature in expand(function)? {
        let spec = function_spec(&signature);
        let key: Vec<String> = spec.parameters.iter().map(|p| p.ty.to_string()).collect();
        if seen.insert(key) {
            members.push(Member::Function(spec));
        } else {
            tracing::trace!(function = %function.name, "Dropped duplicate overload");
        }
    }

    Ok(members)
}

fn function_spec(signature: &Signature) -> FunctionSpec {
    let mut docs: Vec<String> = signature.description.iter().cloned().collect();
    let mut parameters = Vec::with_capacity(signature.parameters.len());

    for (position, parameter) in signature.parameters.iter().enumerate() {
        let name = parameter_name(parameter, position);
        if let Some(description) = &parameter.description {
            docs.push(format!("@param {name} {description}"));
        }
        parameters.push(ParameterSpec {
            name,
            ty: field_type(parameter),
            optional: parameter.optional,
        });
    }

    let returns = match &signature.returns {
        ReturnType::Void => None,
        ReturnType::Value(value) => Some(field_type(value)),
        ReturnType::Deferred(None) => Some(TypeName::generic("Promise", vec![TypeName::any()])),
        ReturnType::Deferred(Some(value)) => {
            Some(TypeName::generic("Promise", vec![field_type(value)]))
        }
    };

    FunctionSpec {
        name: escape_identifier(&signature.name),
        docs,
        parameters,
        returns,
        deprecated: signature.deprecated.clone(),
    }
}

fn browser_file(groups: &[&str], package: &str) -> KotlinFile {
    let method = |name: &str, returns: Option<TypeName>, with_listener: bool| {
        Member::Function(FunctionSpec {
            name: name.to_string(),
            docs: vec![],
            parameters: if with_listener {
                vec![ParameterSpec {
                    name: "listener".to_string(),
                    ty: TypeName::simple("T"),
                    optional: false,
                }]
            } else {
                vec![]
            },
            returns,
            deprecated: None,
        })
    };

    let event = InterfaceSpec {
        name: "ExtensionEvent".to_string(),
        type_parameters: vec!["in T".to_string()],
        docs: vec!["An event that listeners can be attached to.".to_string()],
        members: vec![
            method("addListener", None, true),
            method("removeListener", None, true),
            method("hasListener", Some(TypeName::simple("Boolean")), true),
            method("hasListeners", Some(TypeName::simple("Boolean")), false),
        ],
    };

    let browser = InterfaceSpec {
        name: "Browser".to_string(),
        type_parameters: vec![],
        docs: vec![],
        members: groups
            .iter()
            .map(|group| {
                Member::Property(PropertySpec {
                    name: escape_identifier(group),
                    ty: TypeName::simple(namespace_interface_name(group)),
                    mutable: false,
                    docs: vec![],
                    deprecated: None,
                })
            })
            .collect(),
    };

    KotlinFile {
        package: package.to_string(),
        declarations: vec![
            Declaration::Interface(event),
            Declaration::Interface(browser),
            Declaration::Property(PropertySpec {
                name: "browser".to_string(),
                ty: TypeName::simple("Browser"),
                mutable: false,
                docs: vec![],
                deprecated: None,
            }),
        ],
    }
}

fn parameter_name(parameter: &Parameter, position: usize) -> String {
    parameter
        .name
        .as_deref()
        .map_or_else(|| format!("arg{position}"), escape_identifier)
}

fn push_section(docs: &mut Vec<String>, heading: &str) {
    if !docs.is_empty() {
        docs.push(String::new());
    }
    docs.push(heading.to_string());
}

fn top_level(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once('.').map(|(parent, _)| parent)
}
