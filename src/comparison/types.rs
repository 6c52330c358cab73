//! Comparison request and result types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ComparisonError;

/// The fixed reference company every comparison is made against
pub const DEFAULT_BASE_COMPANY: &str = "Tata Steel";

fn default_base_company() -> String {
    DEFAULT_BASE_COMPANY.to_string()
}

/// A request to compare competitors against the base company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareRequest {
    /// Free-text question, e.g. "revenue and EBITDA for FY24"
    pub query: String,
    /// Companies to compare; at least one
    pub competitors: Vec<String>,
    /// Reference company
    #[serde(default = "default_base_company")]
    pub base_company: String,
}

impl CompareRequest {
    pub fn new(query: impl Into<String>, competitors: Vec<String>) -> Self {
        Self {
            query: query.into(),
            competitors,
            base_company: default_base_company(),
        }
    }

    /// Reject requests without competitors
    pub fn validate(&self) -> Result<(), ComparisonError> {
        if self.competitors.is_empty() {
            return Err(ComparisonError::Validation(
                "competitors must contain at least one company".to_string(),
            ));
        }
        if self.base_company.trim().is_empty() {
            return Err(ComparisonError::Validation(
                "base_company cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Base company followed by the competitors, without repeats
    pub fn companies(&self) -> Vec<String> {
        let mut companies = vec![self.base_company.clone()];
        for competitor in &self.competitors {
            if !companies.contains(competitor) {
                companies.push(competitor.clone());
            }
        }
        companies
    }
}

/// Structured comparison returned to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// One record per metric: `{"Metric": .., "<company>": .., ...}`
    pub table_data: Vec<Map<String, Value>>,
    /// Chart payload (`labels` + `datasets`), passed through untouched
    pub graph_data: Value,
}
