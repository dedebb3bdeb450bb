//! Writing graph descriptions and handing them to Graphviz.

use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::render::GraphDescription;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default file name when the graph must be written for viewing
pub const DEFAULT_DOT_FILE: &str = "aptviz.gv";

/// Serialization of the graph description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Graphviz DOT
    #[default]
    Dot,
    /// JSON
    Json,
}

/// Serialize `description` in `format`.
///
/// # Errors
///
/// Returns [`Error::Json`] if JSON serialization fails.
pub fn serialize(description: &GraphDescription, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Dot => Ok(description.to_dot()),
        OutputFormat::Json => description.to_json(),
    }
}

/// Write serialized output to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`Error::Io`] if a directory or the file cannot be written.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "Wrote graph description");
    Ok(())
}

/// Path of the image rendered from `dot_file`.
#[must_use]
pub fn image_path(dot_file: &Path, format: &str) -> PathBuf {
    dot_file.with_extension(format)
}

/// Render `dot_file` with Graphviz and open the image.
///
/// Returns the image path. The viewer is spawned and not waited for.
///
/// # Errors
///
/// Returns [`Error::Command`] if `dot` cannot run or fails, or if the
/// viewer cannot be spawned.
pub fn view(dot_file: &Path, config: &ViewerConfig) -> Result<PathBuf> {
    let image = image_path(dot_file, &config.format);

    let status = Command::new(&config.dot_program)
        .arg(format!("-T{}", config.format))
        .arg("-o")
        .arg(&image)
        .arg(dot_file)
        .status()
        .map_err(|e| Error::Command {
            program: config.dot_program.clone(),
            message: e.to_string(),
        })?;
    if !status.success() {
        return Err(Error::Command {
            program: config.dot_program.clone(),
            message: status.to_string(),
        });
    }
    tracing::info!(image = %image.display(), "Rendered image");

    Command::new(&config.open_program)
        .arg(&image)
        .spawn()
        .map_err(|e| Error::Command {
            program: config.open_program.clone(),
            message: e.to_string(),
        })?;

    Ok(image)
}
