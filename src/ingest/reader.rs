//! Report text extraction

use std::path::Path;

use super::error::IngestError;

/// Extracts plain text from a report file
pub trait ReportReader: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, IngestError>;
}

/// Reads PDF reports with `pdf-extract`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfReader;

impl ReportReader for PdfReader {
    fn extract_text(&self, path: &Path) -> Result<String, IngestError> {
        pdf_extract::extract_text(path).map_err(|e| IngestError::Extract {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }
}
