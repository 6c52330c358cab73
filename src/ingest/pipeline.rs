//! Report ingest pipeline
//!
//! Walks `reports_dir/<Company>/<file>.pdf`, extracts and chunks the text,
//! embeds the chunks and upserts them into the chunk store. A file that
//! cannot be read or embedded is logged and skipped; the run continues.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::chunker::chunk_text;
use super::error::IngestError;
use super::reader::ReportReader;
use crate::provider::{EmbeddingProvider, TaskType};
use crate::store::{Chunk, ChunkStore};

/// Ingest settings
#[derive(Debug, Clone)]
pub struct IngestSettings {
    /// Root directory with one sub-directory per company
    pub reports_dir: PathBuf,
    /// Characters per chunk
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reports"),
            chunk_size: 2000,
            chunk_overlap: 300,
        }
    }
}

/// A report discovered on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub company: String,
    pub file_name: String,
    pub path: PathBuf,
}

/// Outcome of an ingest run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub files_found: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub chunks_stored: usize,
    pub total_chunks: usize,
}

/// Extract → chunk → embed → store
pub struct IngestPipeline {
    store: Arc<ChunkStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    reader: Box<dyn ReportReader>,
    settings: IngestSettings,
}

impl IngestPipeline {
    pub fn new(
        store: Arc<ChunkStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        reader: Box<dyn ReportReader>,
        settings: IngestSettings,
    ) -> Self {
        Self {
            store,
            embedder,
            reader,
            settings,
        }
    }

    /// Process every report under `reports_dir`
    pub async fn run(&self) -> Result<IngestReport, IngestError> {
        // Fail fast on bad settings before touching any file
        chunk_text("", self.settings.chunk_size, self.settings.chunk_overlap)?;

        let files = discover_reports(&self.settings.reports_dir)?;
        let mut report = IngestReport {
            files_found: files.len(),
            ..Default::default()
        };

        if files.is_empty() {
            tracing::warn!(
                "No PDF files found in company subdirectories of {:?}. \
                 Expected layout: {:?}/<Company>/<report>.pdf",
                self.settings.reports_dir,
                self.settings.reports_dir
            );
            report.total_chunks = self.store.count().await?;
            return Ok(report);
        }

        tracing::info!("Found {} PDF files to process", files.len());

        for (idx, file) in files.iter().enumerate() {
            tracing::info!(
                company = %file.company,
                "[{}/{}] Processing {}",
                idx + 1,
                files.len(),
                file.file_name
            );

            match self.ingest_file(file).await {
                Ok(0) => {
                    tracing::warn!("Could not extract text from {}", file.file_name);
                    report.files_skipped += 1;
                }
                Ok(stored) => {
                    report.files_processed += 1;
                    report.chunks_stored += stored;
                }
                Err(e) => {
                    tracing::error!(file = %file.file_name, error = %e, "Failed to ingest report");
                    report.files_skipped += 1;
                }
            }
        }

        report.total_chunks = self.store.count().await?;
        tracing::info!(
            processed = report.files_processed,
            skipped = report.files_skipped,
            chunks = report.chunks_stored,
            total = report.total_chunks,
            "Ingest complete"
        );

        Ok(report)
    }

    /// Ingest one file; returns the number of chunks stored
    async fn ingest_file(&self, file: &ReportFile) -> Result<usize, IngestError> {
        let text = self.reader.extract_text(&file.path)?;
        if text.trim().is_empty() {
            return Ok(0);
        }

        let texts = chunk_text(&text, self.settings.chunk_size, self.settings.chunk_overlap)?;
        tracing::debug!("Embedding {} chunks for {}", texts.len(), file.file_name);

        let embeddings = self
            .embedder
            .embed_batch(&texts, TaskType::RetrievalDocument)
            .await?;

        let chunks: Vec<Chunk> = texts
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (text, embedding))| {
                Chunk::new(&file.company, &file.file_name, i, text, embedding)
            })
            .collect();

        Ok(self.store.upsert(&chunks).await?)
    }
}

/// List `<dir>/<Company>/*.pdf`, sorted by company then file name.
///
/// Creates `dir` when it does not exist.
pub fn discover_reports(dir: &Path) -> Result<Vec<ReportFile>, IngestError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }

    let mut files = Vec::new();
    for company_entry in std::fs::read_dir(dir)? {
        let company_entry = company_entry?;
        if !company_entry.file_type()?.is_dir() {
            continue;
        }
        let company = company_entry.file_name().to_string_lossy().to_string();

        for file_entry in std::fs::read_dir(company_entry.path())? {
            let file_entry = file_entry?;
            let path = file_entry.path();
            let is_pdf = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false);
            if !is_pdf || !file_entry.file_type()?.is_file() {
                continue;
            }

            files.push(ReportFile {
                company: company.clone(),
                file_name: file_entry.file_name().to_string_lossy().to_string(),
                path,
            });
        }
    }

    files.sort_by(|a, b| (&a.company, &a.file_name).cmp(&(&b.company, &b.file_name)));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use async_trait::async_trait;
    use tempfile::tempdir;

    /// Treats "PDFs" as UTF-8 text files
    struct PlainTextReader;

    impl ReportReader for PlainTextReader {
        fn extract_text(&self, path: &Path) -> Result<String, IngestError> {
            Ok(std::fs::read_to_string(path)?)
        }
    }

    /// Embeds each text as `[len]`; fails for texts containing "boom"
    struct LengthEmbedder;

    #[async_trait]
    impl EmbeddingProvider for LengthEmbedder {
        async fn embed(&self, text: &str, _task: TaskType) -> Result<Vec<f32>, ProviderError> {
            Ok(vec![text.len() as f32])
        }

        async fn embed_batch(
            &self,
            texts: &[String],
            _task: TaskType,
        ) -> Result<Vec<Vec<f32>>, ProviderError> {
            if texts.iter().any(|t| t.contains("boom")) {
                return Err(ProviderError::ApiError {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(texts.iter().map(|t| vec![t.len() as f32]).collect())
        }
    }

    fn write(dir: &Path, company: &str, file: &str, content: &str) {
        let company_dir = dir.join(company);
        std::fs::create_dir_all(&company_dir).unwrap();
        std::fs::write(company_dir.join(file), content).unwrap();
    }

    fn pipeline(store: Arc<ChunkStore>, reports_dir: &Path) -> IngestPipeline {
        IngestPipeline::new(
            store,
            Arc::new(LengthEmbedder),
            Box::new(PlainTextReader),
            IngestSettings {
                reports_dir: reports_dir.to_path_buf(),
                chunk_size: 10,
                chunk_overlap: 2,
            },
        )
    }

    #[test]
    fn test_discover_reports_layout() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Tata Steel", "b.pdf", "x");
        write(dir.path(), "Tata Steel", "a.PDF", "x");
        write(dir.path(), "Tata Steel", "notes.txt", "x");
        write(dir.path(), "JSW Steel", "ar.pdf", "x");
        std::fs::write(dir.path().join("stray.pdf"), "x").unwrap();

        let files = discover_reports(dir.path()).unwrap();
        let names: Vec<(String, String)> = files
            .into_iter()
            .map(|f| (f.company, f.file_name))
            .collect();
        assert_eq!(
            names,
            vec![
                ("JSW Steel".to_string(), "ar.pdf".to_string()),
                ("Tata Steel".to_string(), "a.PDF".to_string()),
                ("Tata Steel".to_string(), "b.pdf".to_string()),
            ]
        );
    }

    #[test]
    fn test_discover_creates_missing_dir() {
        let dir = tempdir().unwrap();
        let reports = dir.path().join("reports");
        assert!(discover_reports(&reports).unwrap().is_empty());
        assert!(reports.is_dir());
    }

    #[tokio::test]
    async fn test_run_stores_chunks_per_company() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Tata Steel", "ar.pdf", "0123456789abcdef");
        write(dir.path(), "JSW Steel", "ar.pdf", "short");

        let store = Arc::new(ChunkStore::open_in_memory("test").unwrap());
        let report = pipeline(store.clone(), dir.path()).run().await.unwrap();

        // "0123456789abcdef": windows start at 0 and 8
        assert_eq!(report.files_found, 2);
        assert_eq!(report.files_processed, 2);
        assert_eq!(report.chunks_stored, 3);
        assert_eq!(report.total_chunks, 3);
        assert_eq!(store.companies().await.unwrap(), vec!["JSW Steel", "Tata Steel"]);

        let second = store.get("Tata Steel_ar.pdf_1").await.unwrap().unwrap();
        assert_eq!(second.text, "89abcdef");
        assert_eq!(second.source, "ar.pdf");
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Tata Steel", "ar.pdf", "0123456789abcdef");

        let store = Arc::new(ChunkStore::open_in_memory("test").unwrap());
        pipeline(store.clone(), dir.path()).run().await.unwrap();
        let report = pipeline(store.clone(), dir.path()).run().await.unwrap();

        assert_eq!(report.chunks_stored, 2);
        assert_eq!(report.total_chunks, 2);
    }

    #[tokio::test]
    async fn test_run_skips_empty_and_failing_files() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Tata Steel", "empty.pdf", "   ");
        write(dir.path(), "Tata Steel", "bad.pdf", "boom boom");
        write(dir.path(), "Tata Steel", "good.pdf", "fine");

        let store = Arc::new(ChunkStore::open_in_memory("test").unwrap());
        let report = pipeline(store, dir.path()).run().await.unwrap();

        assert_eq!(report.files_found, 3);
        assert_eq!(report.files_processed, 1);
        assert_eq!(report.files_skipped, 2);
        assert_eq!(report.chunks_stored, 1);
    }

    #[tokio::test]
    async fn test_run_with_no_reports() {
        let dir = tempdir().unwrap();
        let store = Arc::new(ChunkStore::open_in_memory("test").unwrap());
        let report = pipeline(store, dir.path()).run().await.unwrap();
        assert_eq!(report, IngestReport::default());
    }

    #[tokio::test]
    async fn test_run_rejects_bad_settings() {
        let dir = tempdir().unwrap();
        let store = Arc::new(ChunkStore::open_in_memory("test").unwrap());
        let pipeline = IngestPipeline::new(
            store,
            Arc::new(LengthEmbedder),
            Box::new(PlainTextReader),
            IngestSettings {
                reports_dir: dir.path().to_path_buf(),
                chunk_size: 5,
                chunk_overlap: 5,
            },
        );
        assert!(matches!(
            pipeline.run().await,
            Err(IngestError::InvalidSettings(_))
        ));
    }
}
