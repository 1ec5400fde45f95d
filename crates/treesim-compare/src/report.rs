use std::fmt;

use treesim_core::{Method, TreesimError};

use crate::aggregate::AggregateReport;

fn method_label(method: Method) -> &'static str {
    match method {
        Method::Ratio => "Ratio",
        Method::Distance => "Distance",
    }
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = method_label(self.method);
        let sim_header = format!("Similarity ({label})");
        let diff_header = format!("Difference ({label})");

        let name_width = self
            .rows
            .iter()
            .map(|r| r.key.chars().count())
            .chain(["Name of the file".len()])
            .max()
            .unwrap_or_default();
        let sim_width = sim_header.len();
        let diff_width = diff_header.len();
        let total_width = name_width + sim_width + diff_width + 13 + 16 + 8;

        writeln!(
            f,
            "{:<name_width$}  {:>sim_width$}  {:>diff_width$}  {:>13}  {:>16}",
            "Name of the file", sim_header, diff_header, "Lines of code", "Lines difference"
        )?;
        writeln!(f, "{}", "-".repeat(total_width))?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<name_width$}  {:>sim_width$.2}  {:>diff_width$.2}  {:>13}  {:>16}",
                row.key, row.similarity, row.difference, row.lines, row.line_delta
            )?;
        }
        writeln!(f, "{}", "-".repeat(total_width))?;
        writeln!(
            f,
            "{:<name_width$}  {:>sim_width$.2}  {:>diff_width$.2}  {:>13}  {:>16}",
            "Total",
            self.total.similarity,
            self.total.difference,
            self.total.lines,
            self.total.line_delta
        )
    }
}

impl AggregateReport {
    /// Render the report as a markdown table.
    ///
    /// # Examples
    ///
    /// ```
    /// use treesim_compare::aggregate::aggregate;
    /// use treesim_core::{ComparisonResult, Method};
    ///
    /// let report = aggregate(vec![ComparisonResult::added("a.rs", 1)], vec![], Method::Ratio).unwrap();
    /// let md = report.to_markdown();
    /// assert!(md.contains("| a.rs | 0.00 | 100.00 | 1 | 1 |"));
    /// ```
    pub fn to_markdown(&self) -> String {
        let label = method_label(self.method);
        let mut out = String::new();
        out.push_str("# Similarity Report\n\n");

        if !self.notices.is_empty() {
            for notice in &self.notices {
                out.push_str(&format!("- {notice}\n"));
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "| File | Similarity ({label}) | Difference ({label}) | Lines of code | Lines difference |\n"
        ));
        out.push_str("|------|-----:|-----:|-----:|-----:|\n");
        for row in &self.rows {
            out.push_str(&format!(
                "| {} | {:.2} | {:.2} | {} | {} |\n",
                row.key, row.similarity, row.difference, row.lines, row.line_delta
            ));
        }
        out.push_str(&format!(
            "| **Total** | **{:.2}** | **{:.2}** | **{}** | **{}** |\n",
            self.total.similarity, self.total.difference, self.total.lines, self.total.line_delta
        ));
        out
    }

    /// Render the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TreesimError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String, TreesimError> {
        serde_json::to_string_pretty(self).map_err(TreesimError::from)
    }
}

#[cfg(test)]
mod tests {
    use treesim_core::{ComparisonResult, FileStatus, Notice};

    use crate::aggregate::aggregate;

    use super::*;

    fn sample() -> AggregateReport {
        let rows = vec![
            ComparisonResult {
                key: "src/lib.rs".into(),
                status: FileStatus::Matched,
                similarity: 87.5,
                difference: 12.5,
                lines: 40,
                line_delta: -3,
            },
            ComparisonResult::added("src/new.rs", 10),
        ];
        aggregate(rows, vec![Notice::Added("src/new.rs".into())], Method::Distance).unwrap()
    }

    #[test]
    fn text_table_has_header_rows_and_total() {
        let text = sample().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Name of the file"));
        assert!(lines[0].contains("Similarity (Distance)"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].starts_with("src/lib.rs"));
        assert!(lines[2].contains("87.50"));
        assert!(lines[2].trim_end().ends_with("-3"));
        assert!(lines[5].starts_with("Total"));
        assert!(lines[5].contains("70.00"));
    }

    #[test]
    fn markdown_lists_notices_before_table() {
        let md = sample().to_markdown();
        let notice_at = md.find("src/new.rs is a new file").unwrap();
        let table_at = md.find("| File |").unwrap();
        assert!(notice_at < table_at);
        assert!(md.contains("| **Total** | **70.00** | **30.00** | **50** | **7** |"));
    }

    #[test]
    fn json_uses_camel_case() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["method"], "distance");
        assert_eq!(value["total"]["lineDelta"], 7);
        assert_eq!(value["rows"][1]["status"], "added");
        assert_eq!(value["notices"][0]["kind"], "added");
    }
}
