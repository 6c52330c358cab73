//! Competitor Comparison
//!
//! Turns a free-text question plus a list of competitors into a metric
//! table and chart payload, grounded in the stored annual-report chunks.

mod engine;
mod error;
mod prompt;
mod types;

pub use engine::{parse_model_output, ComparisonEngine, ComparisonSettings};
pub use error::ComparisonError;
pub use prompt::build_prompt;
pub use types::{CompareRequest, ComparisonResult, DEFAULT_BASE_COMPANY};
