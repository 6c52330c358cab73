//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::comparison::ComparisonSettings;
use crate::ingest::IngestSettings;
use crate::provider;
use crate::store;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub comparison: ComparisonConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory with the built dashboard (index.html + wasm bundle)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Base URL the CLI uses to reach the server
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            api_url: default_api_url(),
        }
    }
}

/// Chunk store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_data_dir() -> String {
    "db".to_string()
}

fn default_collection() -> String {
    "steel_reports_v2".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            collection: default_collection(),
        }
    }
}

/// Generative Language API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// Usually left empty here and supplied through `GOOGLE_API_KEY`
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_version() -> String {
    "v1beta".to_string()
}

fn default_embedding_model() -> String {
    "models/text-embedding-004".to_string()
}

fn default_generation_model() -> String {
    "models/learnlm-2.0-flash-experimental".to_string()
}

fn default_request_timeout_ms() -> u64 {
    120_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_base_ms() -> u64 {
    1000
}

fn default_batch_size() -> usize {
    100
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_gemini_base_url(),
            api_version: default_api_version(),
            embedding_model: default_embedding_model(),
            generation_model: default_generation_model(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
            retry_base_ms: default_retry_base_ms(),
            batch_size: default_batch_size(),
        }
    }
}

/// Report ingest configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_reports_dir() -> String {
    "reports".to_string()
}

fn default_chunk_size() -> usize {
    2000
}

fn default_chunk_overlap() -> usize {
    300
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            reports_dir: default_reports_dir(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

/// Comparison engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonConfig {
    #[serde(default = "default_chunks_per_company")]
    pub chunks_per_company: usize,
}

fn default_chunks_per_company() -> usize {
    5
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            chunks_per_company: default_chunks_per_company(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> String {
        format!("peerlens={},tower_http={}", self.level, self.level)
    }

    /// Install the global tracing subscriber. `RUST_LOG` wins over `level`.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive()));

        let registry = tracing_subscriber::registry().with(filter);
        if self.format.eq_ignore_ascii_case("json") {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        } else {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }
}

/// Result of searching the default config locations
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    /// File the config came from; `None` means defaults plus env
    pub source: Option<PathBuf>,
    /// Files that exist but could not be loaded
    pub failures: Vec<ConfigError>,
}

impl ConfigLoad {
    /// Report where the config came from and every file that was skipped
    pub fn log(&self) {
        for failure in &self.failures {
            tracing::warn!("Failed to load config: {}", failure);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// Nothing is logged here: the subscriber is not installed yet. Call
    /// [`ConfigLoad::log`] once logging is up.
    pub fn load_default() -> ConfigLoad {
        Self::load_first(&default_config_paths())
    }

    /// Load the first existing file that parses, collecting the failures
    pub fn load_first(paths: &[PathBuf]) -> ConfigLoad {
        let mut failures = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    return ConfigLoad {
                        config,
                        source: Some(path.clone()),
                        failures,
                    }
                }
                Err(e) => failures.push(e),
            }
        }

        ConfigLoad {
            config: Self::from_env(),
            source: None,
            failures,
        }
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(host) = lookup("PEERLENS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PEERLENS_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Some(dir) = lookup("PEERLENS_STATIC_DIR") {
            self.server.static_dir = dir;
        }
        if let Some(url) = lookup("PEERLENS_API_URL") {
            self.server.api_url = url;
        }

        // Store overrides
        if let Some(dir) = lookup("PEERLENS_DATA_DIR") {
            self.store.data_dir = dir;
        }
        if let Some(collection) = lookup("PEERLENS_COLLECTION") {
            self.store.collection = collection;
        }

        // Gemini overrides
        if let Some(key) = lookup("GOOGLE_API_KEY") {
            self.gemini.api_key = key;
        }
        if let Some(url) = lookup("PEERLENS_GEMINI_URL") {
            self.gemini.base_url = url;
        }
        if let Some(model) = lookup("PEERLENS_EMBEDDING_MODEL") {
            self.gemini.embedding_model = model;
        }
        if let Some(model) = lookup("PEERLENS_GENERATION_MODEL") {
            self.gemini.generation_model = model;
        }

        // Ingest overrides
        if let Some(dir) = lookup("PEERLENS_REPORTS_DIR") {
            self.ingest.reports_dir = dir;
        }

        // Logging overrides
        if let Some(level) = lookup("PEERLENS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("PEERLENS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    pub fn store_config(&self) -> store::StoreConfig {
        store::StoreConfig::new(&self.store.data_dir, &self.store.collection)
    }

    pub fn gemini_config(&self) -> provider::GeminiConfig {
        let g = &self.gemini;
        provider::GeminiConfig {
            base_url: g.base_url.clone(),
            api_version: g.api_version.clone(),
            api_key: g.api_key.clone(),
            embedding_model: g.embedding_model.clone(),
            generation_model: g.generation_model.clone(),
            request_timeout_ms: g.request_timeout_ms,
            max_retries: g.max_retries,
            retry_base_ms: g.retry_base_ms,
            batch_size: g.batch_size,
        }
    }

    pub fn ingest_settings(&self) -> IngestSettings {
        IngestSettings {
            reports_dir: PathBuf::from(&self.ingest.reports_dir),
            chunk_size: self.ingest.chunk_size,
            chunk_overlap: self.ingest.chunk_overlap,
        }
    }

    pub fn comparison_settings(&self) -> ComparisonSettings {
        ComparisonSettings {
            chunks_per_company: self.comparison.chunks_per_company,
        }
    }
}

fn default_config_paths() -> Vec<PathBuf> {
    [
        dirs::config_dir().map(|p| p.join("peerlens").join("config.toml")),
        Some(PathBuf::from("/etc/peerlens/config.toml")),
        Some(PathBuf::from("./config.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# PeerLens Configuration
#
# Environment variables override these settings:
# - PEERLENS_HOST, PEERLENS_PORT, PEERLENS_STATIC_DIR, PEERLENS_API_URL
# - PEERLENS_DATA_DIR, PEERLENS_COLLECTION
# - PEERLENS_GEMINI_URL, PEERLENS_EMBEDDING_MODEL, PEERLENS_GENERATION_MODEL
# - PEERLENS_REPORTS_DIR
# - PEERLENS_LOG_LEVEL, PEERLENS_LOG_FORMAT
#
# The Gemini API key is read from GOOGLE_API_KEY.

[server]
# Address the API server binds to
host = "0.0.0.0"
port = 8000

# Built dashboard served at /
static_dir = "static"

# Server URL used by peerlens-cli
api_url = "http://localhost:8000"

[store]
# Directory holding peerlens.db
data_dir = "db"

# Collection name inside the database
collection = "steel_reports_v2"

[gemini]
base_url = "https://generativelanguage.googleapis.com"
api_version = "v1beta"
embedding_model = "models/text-embedding-004"
generation_model = "models/learnlm-2.0-flash-experimental"

# Per-request timeout (ms)
request_timeout_ms = 120000

# Retries for rate limits, timeouts and connection failures
max_retries = 2
retry_base_ms = 1000

# Texts per batch embedding call (API maximum is 100)
batch_size = 100

[ingest]
# Layout: <reports_dir>/<Company>/<report>.pdf
reports_dir = "reports"

# Chunk window and overlap, in characters
chunk_size = 2000
chunk_overlap = 300

[comparison]
# Chunks retrieved per company for each comparison
chunks_per_company = 5

[logging]
# Log level: trace, debug, info, warn, error (RUST_LOG takes precedence)
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
