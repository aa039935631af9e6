//! PDF export.
//!
//! Rasterization and pagination belong to an external HTML-to-PDF program. This module only
//! hands it the preview page and collects the result, cleaning up after itself on every path.

pub mod handlers;

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF renderer '{program}' could not be started: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("PDF renderer exited with {status}: {stderr}")]
    Renderer { status: String, stderr: String },

    #[error("PDF renderer produced no output")]
    EmptyOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportOptions {
    pub filename: String,
    pub format: PageFormat,
    pub orientation: Orientation,
    pub margin_in: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            filename: "resume.pdf".to_string(),
            format: PageFormat::Letter,
            orientation: Orientation::Portrait,
            margin_in: 0.0,
        }
    }
}

/// Turns the rendered preview page into PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str, options: &ExportOptions) -> Result<Vec<u8>, ExportError>;
}

/// Runs an external converter with wkhtmltopdf-style arguments:
/// `<program> --page-size Letter --orientation Portrait -T 0in -B 0in -L 0in -R 0in in.html out.pdf`.
pub struct CommandPdfRenderer {
    program: PathBuf,
}

impl CommandPdfRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl PdfRenderer for CommandPdfRenderer {
    async fn render_pdf(&self, html: &str, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
        // Dropping the directory removes input and any partial output.
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("resume.html");
        let output = workdir.path().join(&options.filename);
        tokio::fs::write(&input, html).await?;

        let margin = format!("{}in", options.margin_in);
        let page_size = match options.format {
            PageFormat::Letter => "Letter",
        };
        let orientation = match options.orientation {
            Orientation::Portrait => "Portrait",
        };

        let result = Command::new(&self.program)
            .args(["--quiet", "--page-size", page_size, "--orientation", orientation])
            .args(["-T", &margin, "-B", &margin, "-L", &margin, "-R", &margin])
            .arg(&input)
            .arg(&output)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ExportError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            error!("PDF renderer failed ({}): {stderr}", result.status);
            return Err(ExportError::Renderer {
                status: result.status.to_string(),
                stderr,
            });
        }

        let bytes = match tokio::fs::read(&output).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ExportError::EmptyOutput)
            }
            Err(e) => return Err(e.into()),
        };
        if bytes.is_empty() {
            return Err(ExportError::EmptyOutput);
        }

        info!("Rendered {} ({} bytes)", options.filename, bytes.len());
        Ok(bytes)
    }
}
