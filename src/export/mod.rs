//! Analysis export.
//!
//! Writes a stored analysis to a file. JSON and CSV are rendered here; PDF and
//! Excel report [`ExportError::UnsupportedFormat`].

mod csv;
mod json;
mod types;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::info;

use crate::error_handling::ExportError;
use crate::pipeline::AnalysisRecord;

pub use self::csv::render_csv;
pub use json::render_json;
pub use types::ExportFormat;

/// Writes analysis records to files.
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Exports `record` and returns the path written.
    async fn export(
        &self,
        record: &AnalysisRecord,
        format: ExportFormat,
    ) -> Result<PathBuf, ExportError>;
}

/// Writes exports into a directory, one file per call.
#[derive(Debug, Clone)]
pub struct FileExporter {
    output_dir: PathBuf,
}

impl FileExporter {
    /// Exports into `output_dir`, which is created on first use.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Target directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn file_name(record: &AnalysisRecord, format: ExportFormat) -> String {
        let host = url::Url::parse(&record.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "page".to_string());
        let host: String = host
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!(
            "analysis_{}_{}.{}",
            host,
            record.timestamp.format("%Y%m%d_%H%M%S%3f"),
            format.extension()
        )
    }
}

#[async_trait]
impl Exporter for FileExporter {
    async fn export(
        &self,
        record: &AnalysisRecord,
        format: ExportFormat,
    ) -> Result<PathBuf, ExportError> {
        let bytes = match format {
            ExportFormat::Json => render_json(record)?,
            ExportFormat::Csv => render_csv(record)?,
            ExportFormat::Pdf | ExportFormat::Excel => {
                return Err(ExportError::UnsupportedFormat(format))
            }
        };

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(Self::file_name(record, format));
        tokio::fs::write(&path, bytes).await?;
        info!("Exported {} as {} to {}", record.url, format, path.display());
        Ok(path)
    }
}
