//! Generator configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`--config`), then command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where schema documents are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Snapshot compiled into the binary
    #[default]
    EmbeddedDefault,
    /// Every `*.json` file in a local directory
    LocalFiles,
    /// Schema directories of a GitHub repository
    Remote,
}

/// Log levels accepted by `log_level`.
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Generator configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub source: SourceKind,

    /// Schema directory for `local-files`
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Directory replaced with the generated files
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Token for the GitHub API
    #[serde(default)]
    pub api_token: Option<String>,

    /// Kotlin package of the generated files
    #[serde(default = "default_package")]
    pub package: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Repository the `remote` source downloads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// `owner/name` on GitHub
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Branch, tag or commit
    #[serde(default = "default_reference")]
    pub reference: String,

    /// Directories listed for `*.json` files, in order
    #[serde(default = "default_directories")]
    pub directories: Vec<String>,
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source: Option<SourceKind>,
    pub file_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub api_token: Option<String>,
    pub package: Option<String>,
    pub log_level: Option<String>,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("declarations")
}

fn default_package() -> String {
    "webextensions".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_repository() -> String {
    "mozilla/gecko-dev".to_string()
}

fn default_reference() -> String {
    "master".to_string()
}

fn default_directories() -> Vec<String> {
    vec![
        "toolkit/components/extensions/schemas".to_string(),
        "browser/components/extensions/schemas".to_string(),
    ]
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            file_path: None,
            output_path: default_output_path(),
            api_token: None,
            package: default_package(),
            log_level: default_log_level(),
            remote: RemoteConfig::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            reference: default_reference(),
            directories: default_directories(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Apply command-line values on top of this configuration.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(source) = overrides.source {
            self.source = source;
        }
        if overrides.file_path.is_some() {
            self.file_path = overrides.file_path;
        }
        if let Some(output_path) = overrides.output_path {
            self.output_path = output_path;
        }
        if overrides.api_token.is_some() {
            self.api_token = overrides.api_token;
        }
        if let Some(package) = overrides.package {
            self.package = package;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.source == SourceKind::LocalFiles && self.file_path.is_none() {
            anyhow::bail!("--filePath is required when --source is local-files");
        }

        if !is_valid_package(&self.package) {
            anyhow::bail!("Invalid Kotlin package name: '{}'", self.package);
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            anyhow::bail!(
                "Unknown log level '{}' (expected one of: {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            );
        }

        if self.source == SourceKind::Remote {
            if !self.remote.repository.contains('/') {
                anyhow::bail!(
                    "Remote repository should be in owner/name format, got '{}'",
                    self.remote.repository
                );
            }
            if self.remote.directories.is_empty() {
                anyhow::bail!("Remote source needs at least one schema directory");
            }
        }

        Ok(())
    }
}

/// A dotted sequence of plain, non-keyword identifiers.
fn is_valid_package(package: &str) -> bool {
    package.split('.').all(|segment| {
        let mut chars = segment.chars();
        let starts_well = chars
            .next()
            .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');
        starts_well
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !webextgen_kotlin::is_keyword(segment)
    })
}
