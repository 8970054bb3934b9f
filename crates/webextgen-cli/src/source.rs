//! Schema acquisition
//!
//! A [`SchemaSource`] yields raw schema documents; parsing happens later so
//! every source reports errors against the same document names.

use crate::config::{GeneratorConfig, RemoteConfig, SourceKind};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const GITHUB_API: &str = "https://api.github.com";

/// One schema document as read from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFile {
    /// File name, used in error messages.
    pub name: String,
    pub text: String,
}

/// Somewhere schema documents can be read from.
pub trait SchemaSource {
    /// Human-readable location for logs.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Vec<SchemaFile>>;
}

/// Build the source selected by `config`.
pub fn source_for(config: &GeneratorConfig) -> Result<Box<dyn SchemaSource>> {
    Ok(match config.source {
        SourceKind::EmbeddedDefault => Box::new(EmbeddedSchemas),
        SourceKind::LocalFiles => {
            let path = config
                .file_path
                .clone()
                .context("--filePath is required when --source is local-files")?;
            Box::new(LocalSchemaDir::new(path))
        }
        SourceKind::Remote => Box::new(RemoteSchemaTree::new(
            config.remote.clone(),
            config.api_token.clone(),
        )),
    })
}

// ============================================================================
// Embedded snapshot
// ============================================================================

const EMBEDDED: &[(&str, &str)] = &[
    ("alarms.json", include_str!("../schemas/alarms.json")),
    ("devtools_panels.json", include_str!("../schemas/devtools_panels.json")),
    ("manifest.json", include_str!("../schemas/manifest.json")),
    ("runtime.json", include_str!("../schemas/runtime.json")),
    ("storage.json", include_str!("../schemas/storage.json")),
    ("tabs.json", include_str!("../schemas/tabs.json")),
];

/// Schema snapshot compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSchemas;

impl SchemaSource for EmbeddedSchemas {
    fn describe(&self) -> String {
        "embedded snapshot".to_string()
    }

    fn load(&self) -> Result<Vec<SchemaFile>> {
        Ok(EMBEDDED
            .iter()
            .map(|(name, text)| SchemaFile {
                name: (*name).to_string(),
                text: (*text).to_string(),
            })
            .collect())
    }
}

// ============================================================================
// Local directory
// ============================================================================

/// Every `*.json` file directly inside a directory, in file-name order.
#[derive(Debug, Clone)]
pub struct LocalSchemaDir {
    path: PathBuf,
}

impl LocalSchemaDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SchemaSource for LocalSchemaDir {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<SchemaFile>> {
        let entries = std::fs::read_dir(&self.path)
            .with_context(|| format!("Failed to read schema directory: {}", self.path.display()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_schema_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            anyhow::bail!("No *.json schema files found in {}", self.path.display());
        }

        paths
            .into_iter()
            .map(|path| -> Result<SchemaFile> {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read schema: {}", path.display()))?;
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                tracing::debug!(file = %name, bytes = text.len(), "Read schema");
                Ok(SchemaFile { name, text })
            })
            .collect()
    }
}

fn is_schema_file(path: &Path) -> bool {
    path.extension().is_some_and(|extension| extension == "json")
}

// ============================================================================
// GitHub repository
// ============================================================================

/// One entry of a GitHub contents listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Schema directories of a GitHub repository, read through the contents API.
#[derive(Debug, Clone)]
pub struct RemoteSchemaTree {
    remote: RemoteConfig,
    api_token: Option<String>,
}

impl RemoteSchemaTree {
    pub fn new(remote: RemoteConfig, api_token: Option<String>) -> Self {
        Self { remote, api_token }
    }

    fn get(&self, client: &Client, url: &str) -> Result<reqwest::blocking::Response> {
        let mut request = client
            .get(url)
            .header(USER_AGENT, concat!("webextgen/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        request
            .send()
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("Request failed: {url}"))
    }
}

impl SchemaSource for RemoteSchemaTree {
    fn describe(&self) -> String {
        format!("{}@{}", self.remote.repository, self.remote.reference)
    }

    fn load(&self) -> Result<Vec<SchemaFile>> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        let mut files = Vec::new();

        for directory in &self.remote.directories {
            let url = listing_url(&self.remote, directory);
            tracing::info!(directory = %directory, "Listing remote schemas");

            let entries: Vec<ContentEntry> = self
                .get(&client, &url)?
                .json()
                .with_context(|| format!("Unexpected listing format: {url}"))?;

            for (name, download_url) in schema_downloads(entries) {
                let text = self
                    .get(&client, &download_url)?
                    .text()
                    .with_context(|| format!("Failed to download {name}"))?;
                tracing::debug!(file = %name, bytes = text.len(), "Downloaded schema");
                files.push(SchemaFile { name, text });
            }
        }

        if files.is_empty() {
            anyhow::bail!("No *.json schema files found in {}", self.describe());
        }
        Ok(files)
    }
}

/// Contents API URL listing `directory` at the configured reference.
pub fn listing_url(remote: &RemoteConfig, directory: &str) -> String {
    format!(
        "{GITHUB_API}/repos/{}/contents/{}?ref={}",
        remote.repository,
        directory.trim_matches('/'),
        remote.reference
    )
}

/// `(name, download_url)` of every `*.json` file in a listing, sorted by name.
pub fn schema_downloads(entries: Vec<ContentEntry>) -> Vec<(String, String)> {
    let mut downloads: Vec<_> = entries
        .into_iter()
        .filter(|entry| entry.kind == "file" && is_schema_file(Path::new(&entry.name)))
        .filter_map(|entry| entry.download_url.map(|url| (entry.name, url)))
        .collect();
    downloads.sort();
    downloads
}

#[cfg(test)]
#[path = "source/source_tests.rs"]
mod source_tests;
