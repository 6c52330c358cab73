//! Dashboard Controller
//!
//! Everything the dashboard decides, without touching the DOM: which
//! competitors are offered, whether a submission may go out, what the
//! table shows and when the results area is visible. Components hold a
//! `Controller` in a signal and render from it.

use serde::Serialize;
use serde_json::{Map, Value};

/// Reference company; never offered as a competitor
pub const BASE_COMPANY: &str = "Tata Steel";

pub const NO_COMPETITOR_ALERT: &str = "Please select at least one competitor to compare.";
pub const INVALID_DATA_ALERT: &str = "Received invalid data from the server.";
pub const GENERIC_API_ERROR: &str = "An API error occurred.";
pub const COMPANY_LIST_ERROR: &str = "Failed to fetch company list";
pub const NO_DATA_MESSAGE: &str = "No data found for the given query.";

/// A selectable competitor checkbox
#[derive(Debug, Clone, PartialEq)]
pub struct Competitor {
    pub name: String,
    pub checked: bool,
}

/// State of the competitor list
#[derive(Debug, Clone, PartialEq)]
pub enum CompanyList {
    Loading,
    Loaded(Vec<Competitor>),
    /// Rendered inline as `Error: <message>`
    Failed(String),
}

/// Body of `POST /api/compare`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareRequest {
    pub query: String,
    pub competitors: Vec<String>,
    pub base_company: String,
}

/// Chart type offered by the kind selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "line" => ChartKind::Line,
            _ => ChartKind::Bar,
        }
    }
}

/// What the table container shows
#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    /// The "no data" message instead of a table
    Empty,
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl TableView {
    /// Headers come from the first record's keys, in order; one cell per
    /// header in every row.
    pub fn from_records(records: &[Map<String, Value>]) -> Self {
        let Some(first) = records.first() else {
            return TableView::Empty;
        };

        let headers: Vec<String> = first.keys().cloned().collect();
        let rows = records
            .iter()
            .map(|record| headers.iter().map(|h| cell_text(record.get(h))).collect())
            .collect();

        TableView::Table { headers, rows }
    }
}

/// Plain-text cell: strings unquoted, null and missing keys empty
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// A rendered comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    pub table: TableView,
    /// Passed to the chart untouched
    pub graph_data: Value,
    /// Query text at submission time, used in the chart title
    pub query: String,
}

impl Results {
    pub fn chart_title(&self) -> String {
        format!("Company Comparison: {}", self.query)
    }
}

/// Dashboard state machine
#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    pub companies: CompanyList,
    pub query: String,
    /// A comparison request is outstanding; the submit control is disabled
    /// and the loading overlay shown exactly while this is set.
    pub in_flight: bool,
    pub results: Option<Results>,
    pub results_visible: bool,
    /// Bumped each time new results are rendered
    pub results_revision: u64,
    pub show_graph: bool,
    pub chart_kind: ChartKind,
    /// Query of the request in flight
    pending_query: String,
    alert: Option<String>,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            companies: CompanyList::Loading,
            query: String::new(),
            in_flight: false,
            results: None,
            results_visible: false,
            results_revision: 0,
            show_graph: true,
            chart_kind: ChartKind::default(),
            pending_query: String::new(),
            alert: None,
        }
    }
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the result of `GET /api/available-companies`
    pub fn companies_loaded(&mut self, outcome: Result<Vec<String>, String>) {
        self.companies = match outcome {
            Ok(names) => CompanyList::Loaded(
                names
                    .into_iter()
                    .filter(|name| name != BASE_COMPANY)
                    .map(|name| Competitor {
                        name,
                        checked: false,
                    })
                    .collect(),
            ),
            Err(message) => CompanyList::Failed(message),
        };
    }

    pub fn competitors(&self) -> &[Competitor] {
        match &self.companies {
            CompanyList::Loaded(list) => list,
            _ => &[],
        }
    }

    pub fn set_competitor(&mut self, name: &str, checked: bool) {
        if let CompanyList::Loaded(list) = &mut self.companies {
            if let Some(competitor) = list.iter_mut().find(|c| c.name == name) {
                competitor.checked = checked;
            }
        }
    }

    /// Set every competitor checkbox to `checked`
    pub fn toggle_select_all(&mut self, checked: bool) {
        if let CompanyList::Loaded(list) = &mut self.companies {
            for competitor in list.iter_mut() {
                competitor.checked = checked;
            }
        }
    }

    pub fn all_selected(&self) -> bool {
        let list = self.competitors();
        !list.is_empty() && list.iter().all(|c| c.checked)
    }

    pub fn selected_competitors(&self) -> Vec<String> {
        self.competitors()
            .iter()
            .filter(|c| c.checked)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Start a submission. Returns the request to send, or `None` when
    /// nothing may be sent (no competitor selected, or one already in flight).
    pub fn begin_submit(&mut self) -> Option<CompareRequest> {
        if self.in_flight {
            return None;
        }

        let competitors = self.selected_competitors();
        if competitors.is_empty() {
            self.alert = Some(NO_COMPETITOR_ALERT.to_string());
            return None;
        }

        self.in_flight = true;
        self.results_visible = false;
        self.pending_query = self.query.clone();

        Some(CompareRequest {
            query: self.query.clone(),
            competitors,
            base_company: BASE_COMPANY.to_string(),
        })
    }

    /// Finish the in-flight submission, successfully or not
    pub fn complete(&mut self, outcome: Result<Value, String>) {
        self.in_flight = false;
        match outcome {
            Ok(payload) => self.display_results(payload),
            Err(message) => self.alert = Some(format!("Error: {}", message)),
        }
    }

    /// Validate and render a comparison payload
    pub fn display_results(&mut self, payload: Value) {
        let Value::Object(mut body) = payload else {
            self.alert = Some(INVALID_DATA_ALERT.to_string());
            return;
        };

        let graph_data = match body.remove("graph_data") {
            Some(Value::Null) | None => {
                self.alert = Some(INVALID_DATA_ALERT.to_string());
                return;
            }
            Some(graph) => graph,
        };

        let records: Option<Vec<Map<String, Value>>> = match body.remove("table_data") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Some(record),
                    _ => None,
                })
                .collect(),
            _ => None,
        };
        let Some(records) = records else {
            self.alert = Some(INVALID_DATA_ALERT.to_string());
            return;
        };

        self.results = Some(Results {
            table: TableView::from_records(&records),
            graph_data,
            query: std::mem::take(&mut self.pending_query),
        });
        self.results_visible = true;
        self.results_revision += 1;
    }

    /// Show or hide the graph; data is left alone
    pub fn toggle_graph(&mut self, checked: bool) {
        self.show_graph = checked;
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        self.chart_kind = kind;
    }

    pub fn has_alert(&self) -> bool {
        self.alert.is_some()
    }

    /// Pending blocking alert, cleared on read
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded(names: &[&str]) -> Controller {
        let mut controller = Controller::new();
        controller.companies_loaded(Ok(names.iter().map(|n| n.to_string()).collect()));
        controller
    }

    fn payload() -> Value {
        json!({
            "table_data": [{"a": 1, "b": 2}, {"a": 3, "b": 4}],
            "graph_data": {"labels": ["a"], "datasets": []}
        })
    }

    #[test]
    fn test_base_company_never_offered() {
        let controller = loaded(&["JSW Steel", "Tata Steel", "SAIL"]);
        let names: Vec<&str> = controller
            .competitors()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["JSW Steel", "SAIL"]);
    }

    #[test]
    fn test_company_fetch_failure() {
        let mut controller = Controller::new();
        controller.companies_loaded(Err(COMPANY_LIST_ERROR.to_string()));
        assert_eq!(
            controller.companies,
            CompanyList::Failed(COMPANY_LIST_ERROR.to_string())
        );
        assert!(controller.competitors().is_empty());
    }

    #[test]
    fn test_zero_competitors_sends_nothing() {
        let mut controller = loaded(&["JSW Steel"]);
        assert_eq!(controller.begin_submit(), None);
        assert!(!controller.in_flight);
        assert_eq!(controller.take_alert().as_deref(), Some(NO_COMPETITOR_ALERT));
        assert_eq!(controller.take_alert(), None);
    }

    #[test]
    fn test_submit_builds_request() {
        let mut controller = loaded(&["JSW Steel", "SAIL"]);
        controller.query = "revenue FY24".to_string();
        controller.set_competitor("SAIL", true);

        let request = controller.begin_submit().unwrap();
        assert_eq!(
            request,
            CompareRequest {
                query: "revenue FY24".to_string(),
                competitors: vec!["SAIL".to_string()],
                base_company: "Tata Steel".to_string(),
            }
        );
        assert!(controller.in_flight);
        assert!(!controller.results_visible);
    }

    #[test]
    fn test_no_overlapping_submissions() {
        let mut controller = loaded(&["SAIL"]);
        controller.toggle_select_all(true);
        assert!(controller.begin_submit().is_some());
        assert!(controller.begin_submit().is_none());
    }

    #[test]
    fn test_in_flight_cleared_on_success_and_failure() {
        let mut controller = loaded(&["SAIL"]);
        controller.toggle_select_all(true);

        controller.begin_submit().unwrap();
        controller.complete(Ok(payload()));
        assert!(!controller.in_flight);
        assert!(controller.results_visible);

        controller.begin_submit().unwrap();
        controller.complete(Err("Database not initialized.".to_string()));
        assert!(!controller.in_flight);
        assert!(!controller.results_visible);
        assert_eq!(
            controller.take_alert().as_deref(),
            Some("Error: Database not initialized.")
        );
    }

    #[test]
    fn test_table_headers_and_row_order() {
        let mut controller = loaded(&["SAIL"]);
        controller.toggle_select_all(true);
        controller.begin_submit().unwrap();
        controller.complete(Ok(payload()));

        let results = controller.results.as_ref().unwrap();
        assert_eq!(
            results.table,
            TableView::Table {
                headers: vec!["a".to_string(), "b".to_string()],
                rows: vec![
                    vec!["1".to_string(), "2".to_string()],
                    vec!["3".to_string(), "4".to_string()],
                ],
            }
        );
    }

    #[test]
    fn test_empty_table_data() {
        assert_eq!(TableView::from_records(&[]), TableView::Empty);

        let mut controller = Controller::new();
        controller.display_results(json!({"table_data": [], "graph_data": {}}));
        assert_eq!(controller.results.unwrap().table, TableView::Empty);
    }

    #[test]
    fn test_missing_cells_render_empty() {
        let records: Vec<Map<String, Value>> = serde_json::from_value(json!([
            {"Metric": "Revenue", "JSW Steel": "175,000"},
            {"Metric": "EBITDA", "JSW Steel": null},
            {"Metric": "Debt"}
        ]))
        .unwrap();

        match TableView::from_records(&records) {
            TableView::Table { rows, .. } => {
                assert_eq!(rows[0], vec!["Revenue", "175,000"]);
                assert_eq!(rows[1], vec!["EBITDA", ""]);
                assert_eq!(rows[2], vec!["Debt", ""]);
            }
            TableView::Empty => panic!("expected a table"),
        }
    }

    #[test]
    fn test_invalid_payloads() {
        for bad in [
            json!({"graph_data": {}}),
            json!({"table_data": []}),
            json!({"table_data": [], "graph_data": null}),
            json!({"table_data": "rows", "graph_data": {}}),
            json!("not an object"),
        ] {
            let mut controller = Controller::new();
            controller.display_results(bad);
            assert_eq!(controller.take_alert().as_deref(), Some(INVALID_DATA_ALERT));
            assert!(controller.results.is_none());
            assert!(!controller.results_visible);
        }
    }

    #[test]
    fn test_graph_toggle_keeps_results() {
        let mut controller = Controller::new();
        controller.display_results(payload());
        let revision = controller.results_revision;
        let before = controller.results.clone();

        controller.toggle_graph(false);
        controller.toggle_graph(true);
        controller.set_chart_kind(ChartKind::Line);

        assert_eq!(controller.results_revision, revision);
        assert_eq!(controller.results, before);
    }

    #[test]
    fn test_chart_title_uses_submitted_query() {
        let mut controller = loaded(&["SAIL"]);
        controller.toggle_select_all(true);
        controller.query = "EBITDA".to_string();
        controller.begin_submit().unwrap();
        controller.query = "edited while waiting".to_string();
        controller.complete(Ok(payload()));

        assert_eq!(
            controller.results.unwrap().chart_title(),
            "Company Comparison: EBITDA"
        );
    }

    #[test]
    fn test_select_all() {
        let mut controller = loaded(&["JSW Steel", "SAIL"]);
        controller.toggle_select_all(true);
        assert!(controller.all_selected());
        assert_eq!(controller.selected_competitors(), vec!["JSW Steel", "SAIL"]);

        controller.set_competitor("SAIL", false);
        assert!(!controller.all_selected());

        controller.toggle_select_all(false);
        assert!(controller.selected_competitors().is_empty());
    }

    #[test]
    fn test_chart_kind_parse() {
        assert_eq!(ChartKind::parse("line"), ChartKind::Line);
        assert_eq!(ChartKind::parse("bar"), ChartKind::Bar);
        assert_eq!(ChartKind::Line.as_str(), "line");
    }
}
