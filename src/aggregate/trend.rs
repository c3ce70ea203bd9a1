use std::collections::HashMap;

use serde::Serialize;

use super::sort_by_display_order;
use crate::releases::{TrendKind, TrendWindow};
use crate::types::ClassifiedIssue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRow {
    pub portfolio: String,
    /// One count per column.
    pub counts: Vec<usize>,
    pub total: usize,
}

/// Portfolio × window counts with a totals row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendTable {
    pub columns: Vec<String>,
    pub rows: Vec<TrendRow>,
    pub totals: Vec<usize>,
    pub grand_total: usize,
}

impl TrendTable {
    pub fn count(&self, portfolio: &str, column: &str) -> usize {
        let Some(col) = self.columns.iter().position(|c| c == column) else {
            return 0;
        };
        self.rows
            .iter()
            .find(|r| r.portfolio == portfolio)
            .map(|r| r.counts[col])
            .unwrap_or(0)
    }
}

/// Count issues per portfolio for each `(column, issues)` pair.
///
/// Rows cover only portfolios that appear somewhere, in display order with
/// unlisted portfolios alphabetically after.
pub fn aggregate_windows(columns: &[(String, &[ClassifiedIssue])], order: &[String]) -> TrendTable {
    let mut counts: HashMap<&str, Vec<usize>> = HashMap::new();
    for (col, (_, issues)) in columns.iter().enumerate() {
        for issue in issues.iter() {
            let row = counts
                .entry(issue.portfolio.as_str())
                .or_insert_with(|| vec![0; columns.len()]);
            row[col] += 1;
        }
    }

    let mut portfolios: Vec<String> = counts.keys().map(|p| p.to_string()).collect();
    sort_by_display_order(&mut portfolios, order);

    let rows: Vec<TrendRow> = portfolios
        .into_iter()
        .map(|portfolio| {
            let counts = counts.remove(portfolio.as_str()).unwrap_or_default();
            let total = counts.iter().sum();
            TrendRow {
                portfolio,
                counts,
                total,
            }
        })
        .collect();

    let mut totals = vec![0; columns.len()];
    for row in &rows {
        for (t, c) in totals.iter_mut().zip(&row.counts) {
            *t += c;
        }
    }

    TrendTable {
        columns: columns.iter().map(|(name, _)| name.clone()).collect(),
        grand_total: totals.iter().sum(),
        rows,
        totals,
    }
}

/// The three trend tables: open at period start, added, and resolved.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub before: TrendTable,
    pub additions: TrendTable,
    pub resolved: TrendTable,
}

/// Split fetched windows by kind and aggregate each kind with release labels
/// as columns. Windows missing from `fetched` count as empty.
pub fn trend_summary(
    windows: &[TrendWindow],
    fetched: &HashMap<String, Vec<ClassifiedIssue>>,
    order: &[String],
) -> TrendSummary {
    let table = |kind: TrendKind| {
        let columns: Vec<(String, &[ClassifiedIssue])> = windows
            .iter()
            .filter(|w| w.kind == kind)
            .map(|w| {
                let issues = fetched.get(&w.name).map(Vec::as_slice).unwrap_or(&[]);
                (w.label.clone(), issues)
            })
            .collect();
        aggregate_windows(&columns, order)
    };

    TrendSummary {
        before: table(TrendKind::Before),
        additions: table(TrendKind::Addition),
        resolved: table(TrendKind::Resolved),
    }
}
