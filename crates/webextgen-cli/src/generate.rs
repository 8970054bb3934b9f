//! Generation command: acquire, parse, resolve, emit, write.

use crate::config::GeneratorConfig;
use crate::source::{SchemaFile, source_for};
use anyhow::{Context, Result};
use std::path::Path;
use webextgen_kotlin::{EmitOptions, generate, write_files};
use webextgen_schema::{parse_document, resolve_api};

/// Counts reported after a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub schema_files: usize,
    pub namespaces: usize,
    pub types: usize,
    pub output_files: usize,
}

/// Run the generator as configured.
pub fn run(config: &GeneratorConfig) -> Result<GenerationSummary> {
    config.validate()?;

    let source = source_for(config)?;
    tracing::info!(source = %source.describe(), "Loading schemas");
    let schemas = source
        .load()
        .with_context(|| format!("Failed to load schemas from {}", source.describe()))?;

    generate_from(&schemas, &config.output_path, &config.package)
}

/// Generate declarations for already-loaded documents into `output_path`.
///
/// Nothing is written unless every document parses and the whole API
/// resolves.
pub fn generate_from(
    schemas: &[SchemaFile],
    output_path: &Path,
    package: &str,
) -> Result<GenerationSummary> {
    let mut fragments = Vec::new();
    for schema in schemas {
        let namespaces = parse_document(&schema.name, &schema.text)?;
        tracing::debug!(file = %schema.name, namespaces = namespaces.len(), "Parsed schema");
        fragments.extend(namespaces);
    }

    let api = resolve_api(fragments).context("Failed to resolve schemas")?;

    let options = EmitOptions {
        package: package.to_string(),
    };
    let files = generate(&api, &options).context("Failed to generate declarations")?;

    write_files(output_path, &files)
        .with_context(|| format!("Failed to write output: {}", output_path.display()))?;

    Ok(GenerationSummary {
        schema_files: schemas.len(),
        namespaces: api.namespaces.len(),
        types: api.registry.len(),
        output_files: files.len(),
    })
}
