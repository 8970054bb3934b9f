//! Writing rendered files into a clean output directory.

use crate::error::{EmitError, EmitResult};
use std::fs;
use std::path::{Path, PathBuf};

/// A rendered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output directory.
    pub path: PathBuf,
    pub content: String,
}

/// Replace `output_dir` with exactly `files`.
///
/// The directory is deleted if present and recreated, so the result never
/// mixes old and new output. Paths without a final named component (`/`,
/// `.`, `..`) are refused.
pub fn write_files(output_dir: &Path, files: &[GeneratedFile]) -> EmitResult<()> {
    if output_dir.file_name().is_none() {
        return Err(EmitError::UnsafeOutputPath {
            path: output_dir.to_path_buf(),
        });
    }

    if output_dir.exists() {
        tracing::debug!(path = %output_dir.display(), "Removing previous output");
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;

    for file in files {
        let target = output_dir.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &file.content)?;
        tracing::debug!(path = %target.display(), bytes = file.content.len(), "Wrote file");
    }

    tracing::info!(
        path = %output_dir.display(),
        files = files.len(),
        "Wrote output directory"
    );
    Ok(())
}
