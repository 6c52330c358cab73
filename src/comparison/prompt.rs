//! Prompt construction for structured comparisons

/// Build the analyst prompt asking for `table_data` and `graph_data`
pub fn build_prompt(query: &str, base_company: &str, competitors: &[String], context: &str) -> String {
    format!(
        r#"You are an expert financial data analyst. Extract and compare financial metrics from the annual-report excerpts below.
Compare {competitors} against {base} for the request: "{query}".

Respond with a single JSON object with exactly two keys, "table_data" and "graph_data".

1. "table_data": an array of objects, one per financial metric. Every object has a "Metric" key followed by one key per company ({companies}) whose value is a string. Use "N/A" when a value cannot be found.
   Example: [{{"Metric": "Revenue (in Cr)", "{base}": "240,000", "{example_competitor}": "225,000"}}]

2. "graph_data": an object for a bar or line chart with a "labels" array (company names) and a "datasets" array. Each dataset has a "label" (metric name) and a "data" array holding only numbers, one per label, in label order. Strip commas and currency symbols; use 0 where the table says "N/A".
   Example: {{"labels": ["{base}", "{example_competitor}"], "datasets": [{{"label": "Revenue (in Cr)", "data": [240000, 225000]}}]}}

Return only the JSON object, with no commentary before or after it.

CONTEXT:
---
{context}
---

JSON_OUTPUT:
"#,
        competitors = competitors.join(", "),
        base = base_company,
        query = query,
        companies = std::iter::once(base_company.to_string())
            .chain(competitors.iter().cloned())
            .collect::<Vec<_>>()
            .join(", "),
        example_competitor = competitors.first().map(String::as_str).unwrap_or("Competitor"),
        context = context,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_companies_and_query() {
        let prompt = build_prompt(
            "revenue FY24",
            "Tata Steel",
            &["JSW Steel".to_string(), "SAIL".to_string()],
            "excerpt one\n\nexcerpt two",
        );

        assert!(prompt.contains("Compare JSW Steel, SAIL against Tata Steel"));
        assert!(prompt.contains("\"revenue FY24\""));
        assert!(prompt.contains("(Tata Steel, JSW Steel, SAIL)"));
        assert!(prompt.contains("excerpt one\n\nexcerpt two"));
        assert!(prompt.contains("\"table_data\""));
        assert!(prompt.contains("\"graph_data\""));
    }

    #[test]
    fn test_prompt_example_braces_are_literal() {
        let prompt = build_prompt("q", "Tata Steel", &["JSW Steel".to_string()], "");
        assert!(prompt.contains(r#"[{"Metric": "Revenue (in Cr)", "Tata Steel": "240,000", "JSW Steel": "225,000"}]"#));
    }
}
