use serde::Serialize;
use treesim_core::{ComparisonResult, Method, Notice, TreesimError};

/// Per-file rows plus the lines-of-code weighted total.
///
/// # Examples
///
/// ```
/// use treesim_compare::aggregate::aggregate;
/// use treesim_core::{ComparisonResult, Method};
///
/// let rows = vec![ComparisonResult::added("new.rs", 4)];
/// let report = aggregate(rows, Vec::new(), Method::Ratio).unwrap();
/// assert_eq!(report.total.lines, 4);
/// assert_eq!(report.total.similarity, 0.0);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    /// Method used to score matched pairs.
    pub method: Method,
    /// One row per compared file.
    pub rows: Vec<ComparisonResult>,
    /// Synthetic total row.
    pub total: TotalRow,
    /// Added/removed file notices from the differ.
    pub notices: Vec<Notice>,
}

/// Totals across all rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalRow {
    /// Mean similarity, weighted by each row's line count.
    pub similarity: f64,
    /// `100 - similarity`.
    pub difference: f64,
    /// Sum of row line counts.
    pub lines: usize,
    /// Sum of row line deltas.
    pub line_delta: i64,
}

/// Combine per-file rows into a report.
///
/// Each row contributes `similarity * lines / total_lines`. When every row
/// has zero lines the weights are undefined and rows count equally.
///
/// # Errors
///
/// Returns [`TreesimError::NoMatchingFiles`] if `rows` is empty.
pub fn aggregate(
    rows: Vec<ComparisonResult>,
    notices: Vec<Notice>,
    method: Method,
) -> Result<AggregateReport, TreesimError> {
    if rows.is_empty() {
        return Err(TreesimError::NoMatchingFiles);
    }

    let lines: usize = rows.iter().map(|r| r.lines).sum();
    let line_delta: i64 = rows.iter().map(|r| r.line_delta).sum();

    let similarity = if lines == 0 {
        rows.iter().map(|r| r.similarity).sum::<f64>() / rows.len() as f64
    } else {
        let weighted: f64 = rows
            .iter()
            .map(|r| r.similarity / 100.0 * r.lines as f64)
            .sum();
        weighted / lines as f64 * 100.0
    };

    Ok(AggregateReport {
        method,
        rows,
        total: TotalRow {
            similarity,
            difference: 100.0 - similarity,
            lines,
            line_delta,
        },
        notices,
    })
}
