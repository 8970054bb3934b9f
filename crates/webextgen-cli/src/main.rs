//! webextgen - Kotlin/JS declarations for browser extension APIs
//!
//! Reads WebExtension JSON schema documents, merges and resolves them, and
//! writes one Kotlin file per top-level namespace plus `Browser.kt`.

use clap::Parser;
use std::path::PathBuf;

mod config;
mod generate;
mod logging;
mod source;

use config::{GeneratorConfig, Overrides, SourceKind};

#[derive(Parser)]
#[command(name = "webextgen")]
#[command(author, version, about = "Generate Kotlin/JS declarations from WebExtension schemas", long_about = None)]
struct Cli {
    /// Where to read schemas from
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// Schema directory for --source local-files
    #[arg(long = "filePath")]
    file_path: Option<PathBuf>,

    /// Output directory; replaced on every run (default: declarations)
    #[arg(short = 'o', long = "outputPath")]
    output_path: Option<PathBuf>,

    /// GitHub token for --source remote
    #[arg(long = "apiToken")]
    api_token: Option<String>,

    /// Kotlin package of the generated files (default: webextensions)
    #[arg(long)]
    package: Option<String>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (default: info)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<GeneratorConfig> {
        let base = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)?,
            None => GeneratorConfig::default(),
        };

        Ok(base.with_overrides(Overrides {
            source: self.source,
            file_path: self.file_path,
            output_path: self.output_path,
            api_token: self.api_token,
            package: self.package,
            log_level: self.log_level,
        }))
    }
}

fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;
    config.validate()?;
    logging::init_logging(&config.log_level)?;

    let summary = generate::run(&config)?;

    tracing::info!(
        schemas = summary.schema_files,
        namespaces = summary.namespaces,
        types = summary.types,
        files = summary.output_files,
        output = %config.output_path.display(),
        "Generation complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn Cli___definition___is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn Cli___parse___accepts_documented_flags() {
        let cli = Cli::try_parse_from([
            "webextgen",
            "--source",
            "local-files",
            "--filePath",
            "schemas",
            "-o",
            "out",
            "--apiToken",
            "token",
        ])
        .unwrap();

        let config = cli.into_config().unwrap();

        assert_eq!(config.source, SourceKind::LocalFiles);
        assert_eq!(config.file_path, Some(PathBuf::from("schemas")));
        assert_eq!(config.output_path, PathBuf::from("out"));
        assert_eq!(config.api_token.as_deref(), Some("token"));
    }

    #[test]
    fn Cli___parse___long_output_path() {
        let cli = Cli::try_parse_from(["webextgen", "--outputPath", "build", "--source", "embedded-default"])
            .unwrap();

        let config = cli.into_config().unwrap();

        assert_eq!(config.output_path, PathBuf::from("build"));
        assert_eq!(config.source, SourceKind::EmbeddedDefault);
    }

    #[test]
    fn Cli___parse___unknown_source___fails() {
        assert!(Cli::try_parse_from(["webextgen", "--source", "ftp"]).is_err());
    }

    #[test]
    fn Cli___into_config___flags_override_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("webextgen.toml");
        std::fs::write(&path, "package = \"from.file\"\noutput_path = \"file-out\"\n").unwrap();
        let cli = Cli::try_parse_from([
            "webextgen",
            "--config",
            path.to_str().unwrap(),
            "--package",
            "from.flag",
        ])
        .unwrap();

        let config = cli.into_config().unwrap();

        assert_eq!(config.package, "from.flag");
        assert_eq!(config.output_path, PathBuf::from("file-out"));
    }
}
