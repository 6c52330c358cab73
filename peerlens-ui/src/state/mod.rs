//! State Management
//!
//! Dashboard controller logic and the signal-backed global state.

pub mod chart_data;
pub mod controller;
pub mod global;

pub use chart_data::ChartSpec;
pub use controller::{ChartKind, CompanyList, CompareRequest, Controller, TableView};
pub use global::{provide_global_state, GlobalState};
