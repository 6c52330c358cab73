//! Chart Data
//!
//! Reads Chart.js-style graph data (`labels` + `datasets`) for the canvas
//! chart. The payload itself is never modified.

use serde_json::Value;

/// One series
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    /// `None` marks a gap
    pub values: Vec<Option<f64>>,
}

/// Drawable view of the graph data
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    /// `None` when the payload is not `{labels: [..], datasets: [{label, data}]}`
    pub fn from_graph_data(graph: &Value) -> Option<Self> {
        let labels = graph
            .get("labels")?
            .as_array()?
            .iter()
            .map(label_text)
            .collect::<Vec<_>>();

        let series = graph
            .get("datasets")?
            .as_array()?
            .iter()
            .enumerate()
            .map(|(idx, dataset)| {
                let values = dataset
                    .get("data")?
                    .as_array()?
                    .iter()
                    .map(numeric)
                    .collect();
                let label = dataset
                    .get("label")
                    .map(label_text)
                    .unwrap_or_else(|| format!("Series {}", idx + 1));
                Some(Series { label, values })
            })
            .collect::<Option<Vec<_>>>()?;

        if labels.is_empty() || series.is_empty() {
            return None;
        }

        Some(Self { labels, series })
    }

    /// Y axis range; always includes zero
    pub fn y_bounds(&self) -> (f64, f64) {
        let values = self.series.iter().flat_map(|s| s.values.iter().flatten());
        let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(*v), hi.max(*v)));

        if min == max {
            return (0.0, 1.0);
        }

        let step = nice_step((max - min) / 5.0);
        ((min / step).floor() * step, (max / step).ceil() * step)
    }
}

/// Round a raw tick step up to 1, 2 or 5 × 10ⁿ
pub fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Numbers as-is; numeric strings such as "1,200" parsed; anything else a gap
fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.replace(',', "").trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_chart_js_shape() {
        let graph = json!({
            "labels": ["Revenue", "EBITDA"],
            "datasets": [
                {"label": "Tata Steel", "data": [240000, 0], "backgroundColor": "red"},
                {"label": "JSW Steel", "data": ["175,000", null]}
            ]
        });

        let spec = ChartSpec::from_graph_data(&graph).unwrap();
        assert_eq!(spec.labels, vec!["Revenue", "EBITDA"]);
        assert_eq!(spec.series[0].values, vec![Some(240000.0), Some(0.0)]);
        assert_eq!(spec.series[1].label, "JSW Steel");
        assert_eq!(spec.series[1].values, vec![Some(175000.0), None]);
    }

    #[test]
    fn test_rejects_other_shapes() {
        for graph in [
            json!(null),
            json!([1, 2, 3]),
            json!({"labels": ["a"]}),
            json!({"labels": [], "datasets": [{"label": "x", "data": []}]}),
            json!({"labels": ["a"], "datasets": []}),
            json!({"labels": ["a"], "datasets": [{"label": "x"}]}),
        ] {
            assert!(ChartSpec::from_graph_data(&graph).is_none(), "{}", graph);
        }
    }

    #[test]
    fn test_y_axis_begins_at_zero() {
        let graph = json!({
            "labels": ["a", "b"],
            "datasets": [{"label": "x", "data": [120, 480]}]
        });
        let (lo, hi) = ChartSpec::from_graph_data(&graph).unwrap().y_bounds();
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 500.0);
    }

    #[test]
    fn test_y_axis_with_negatives() {
        let graph = json!({
            "labels": ["a", "b"],
            "datasets": [{"label": "x", "data": [-30, 70]}]
        });
        let (lo, hi) = ChartSpec::from_graph_data(&graph).unwrap().y_bounds();
        assert_eq!((lo, hi), (-40.0, 80.0));
    }

    #[test]
    fn test_all_zero_series() {
        let graph = json!({"labels": ["a"], "datasets": [{"label": "x", "data": [0]}]});
        assert_eq!(ChartSpec::from_graph_data(&graph).unwrap().y_bounds(), (0.0, 1.0));
    }

    #[test]
    fn test_non_finite_strings_are_gaps() {
        let graph = json!({
            "labels": ["FY22", "FY23", "FY24"],
            "datasets": [{"label": "SAIL", "data": ["inf", "NaN", "1,500"]}]
        });
        let chart = ChartSpec::from_graph_data(&graph).unwrap();
        assert_eq!(chart.series[0].values, vec![None, None, Some(1500.0)]);

        let (lo, hi) = chart.y_bounds();
        assert!(lo.is_finite() && hi.is_finite());
        assert_eq!(lo, 0.0);
        assert!(hi >= 1500.0);
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(96.0), 100.0);
        assert_eq!(nice_step(20.0), 20.0);
        assert_eq!(nice_step(0.3), 0.5);
        assert_eq!(nice_step(0.0), 1.0);
    }
}
