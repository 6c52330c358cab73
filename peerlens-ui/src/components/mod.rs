//! UI Components
//!
//! Leptos components for the comparison dashboard.

pub mod chart;
pub mod competitor_list;
pub mod loading;
pub mod query_form;
pub mod results;

pub use chart::Chart;
pub use competitor_list::CompetitorList;
pub use loading::LoadingOverlay;
pub use query_form::QueryForm;
pub use results::Results;
