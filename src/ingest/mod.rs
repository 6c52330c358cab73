//! Report Ingest
//!
//! Builds the chunk store from a directory of annual-report PDFs.

mod chunker;
mod error;
mod pipeline;
mod reader;

pub use chunker::chunk_text;
pub use error::IngestError;
pub use pipeline::{discover_reports, IngestPipeline, IngestReport, IngestSettings, ReportFile};
pub use reader::{PdfReader, ReportReader};
