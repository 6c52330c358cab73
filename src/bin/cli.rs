//! PeerLens CLI
//!
//! Command-line interface for PeerLens operations:
//! - Ingest annual reports into the chunk store
//! - List companies and run comparisons against a running server
//! - List generation-capable models
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

use peerlens::comparison::{CompareRequest, ComparisonResult, DEFAULT_BASE_COMPANY};
use peerlens::config::{generate_default_config, Config};
use peerlens::ingest::{IngestPipeline, PdfReader};
use peerlens::provider::GeminiClient;
use peerlens::store::ChunkStore;

const NO_DATA_MESSAGE: &str = "No data found for the given query.";

#[derive(Parser)]
#[command(name = "peerlens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compare steel companies using their annual reports")]
#[command(long_about = "PeerLens compares a base company against its competitors.\nIngest annual-report PDFs, then ask questions like \"revenue and EBITDA for FY24\".")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (default: server.api_url from config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract, chunk and embed every report under the reports directory
    Ingest {
        /// Reports directory laid out as <dir>/<Company>/<report>.pdf
        #[arg(short, long)]
        reports_dir: Option<PathBuf>,
    },

    /// List companies available for comparison
    Companies,

    /// Compare competitors against the base company
    Compare {
        /// Question to answer, e.g. "revenue and EBITDA for FY24"
        query: String,
        /// Competitor to include (repeatable)
        #[arg(short, long = "competitor")]
        competitors: Vec<String>,
        /// Reference company
        #[arg(short, long, default_value = DEFAULT_BASE_COMPANY)]
        base: String,
    },

    /// List models that support content generation
    Models,

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = Config::load_default();
    for failure in &loaded.failures {
        eprintln!("Warning: {}", failure);
    }
    let config = loaded.config;
    let api_url = cli
        .api_url
        .clone()
        .unwrap_or_else(|| config.server.api_url.clone());
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Ingest { reports_dir } => {
            config.logging.init();

            let mut settings = config.ingest_settings();
            if let Some(dir) = reports_dir {
                settings.reports_dir = dir;
            }

            let gemini = Arc::new(
                GeminiClient::new(config.gemini_config())
                    .context("Cannot create Gemini client")?,
            );
            let store = Arc::new(
                ChunkStore::open(&config.store_config()).context("Cannot open chunk store")?,
            );

            let pipeline = IngestPipeline::new(store, gemini, Box::new(PdfReader), settings);
            let report = pipeline.run().await?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                _ => {
                    println!("Ingest results:");
                    println!("  Files found: {}", report.files_found);
                    println!("  Files processed: {}", report.files_processed);
                    println!("  Files skipped: {}", report.files_skipped);
                    println!("  Chunks stored: {}", report.chunks_stored);
                    println!("  Total chunks in store: {}", report.total_chunks);
                }
            }
        }

        Commands::Companies => {
            let response = client
                .get(format!("{}/api/available-companies", api_url))
                .send()
                .await
                .with_context(|| format!("Cannot connect to PeerLens API at {}", api_url))?;

            if !response.status().is_success() {
                bail!("Failed to fetch companies: {}", error_detail(response).await);
            }

            let data: Value = response.json().await?;
            let companies: Vec<&str> = data["companies"]
                .as_array()
                .map(|a| a.iter().filter_map(|c| c.as_str()).collect())
                .unwrap_or_default();

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&data)?),
                _ if companies.is_empty() => {
                    println!("No companies in the store yet.");
                    println!();
                    println!("Ingest reports with:");
                    println!("  peerlens-cli ingest --reports-dir reports");
                }
                _ => {
                    for company in companies {
                        println!("{}", company);
                    }
                }
            }
        }

        Commands::Compare {
            query,
            competitors,
            base,
        } => {
            if competitors.is_empty() {
                bail!("Please select at least one competitor to compare.");
            }

            let request = CompareRequest {
                query,
                competitors,
                base_company: base,
            };

            let response = client
                .post(format!("{}/api/compare", api_url))
                .json(&request)
                .send()
                .await
                .with_context(|| format!("Cannot connect to PeerLens API at {}", api_url))?;

            if !response.status().is_success() {
                bail!("{}", error_detail(response).await);
            }

            let result: ComparisonResult = response
                .json()
                .await
                .context("Received invalid data from the server.")?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&result)?),
                "csv" => write_csv(&result.table_data, std::io::stdout())?,
                _ => print!("{}", render_table(&result.table_data)),
            }
        }

        Commands::Models => {
            config.logging.init();

            let gemini = GeminiClient::new(config.gemini_config())
                .context("Cannot create Gemini client")?;
            let models = gemini.list_models().await?;

            match cli.format.as_str() {
                "json" => {
                    let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
                    println!("{}", serde_json::to_string_pretty(&names)?);
                }
                _ => {
                    println!("{:<50} {}", "Name", "Display name");
                    println!("{}", "-".repeat(80));
                    for model in &models {
                        println!(
                            "{:<50} {}",
                            model.name,
                            model.display_name.as_deref().unwrap_or("-")
                        );
                    }
                }
            }
        }

        Commands::Status => {
            let response = client.get(format!("{}/health", api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: Value = resp.json().await?;

                    println!("PeerLens v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!("Store: {}", health["store"].as_str().unwrap_or("unknown"));
                    if let Some(chunks) = health["chunks"].as_u64() {
                        println!("  Chunks: {}", chunks);
                    }
                    if let Some(companies) = health["companies"].as_u64() {
                        println!("  Companies: {}", companies);
                    }
                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => bail!("API returned error: {}", resp.status()),
                Err(e) => {
                    eprintln!("Cannot connect to PeerLens API at {}", api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the PeerLens server is running:");
                    eprintln!("  cargo run --bin peerlens");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// The server's `detail` message, or a generic one
async fn error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    let body: Option<Value> = response.json().await.ok();
    body.as_ref()
        .and_then(|b| b["detail"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("An API error occurred. ({})", status))
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

/// Column headers: the first record's keys, in order
fn table_headers(rows: &[Map<String, Value>]) -> Vec<String> {
    rows.first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default()
}

/// Plain-text cell: strings unquoted, null and missing keys empty
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn render_table(rows: &[Map<String, Value>]) -> String {
    let headers = table_headers(rows);
    if headers.is_empty() {
        return format!("{}\n", NO_DATA_MESSAGE);
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| headers.iter().map(|h| cell_text(row.get(h))).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |values: &[String]| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&format_row(&headers));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 3 * (widths.len() - 1)));
    out.push('\n');
    for row in &cells {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out
}

fn write_csv<W: std::io::Write>(rows: &[Map<String, Value>], out: W) -> anyhow::Result<()> {
    let headers = table_headers(rows);
    let mut writer = csv::Writer::from_writer(out);

    if !headers.is_empty() {
        writer.write_record(&headers)?;
    }
    for row in rows {
        writer.write_record(headers.iter().map(|h| cell_text(row.get(h))))?;
    }
    writer.flush()?;
    Ok(())
}
