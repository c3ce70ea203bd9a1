use std::collections::BTreeMap;

use serde::Serialize;

use super::parse_jira_timestamp;
use crate::types::ClassifiedIssue;

const DONE_CATEGORY: &str = "Done";
const UNKNOWN_TEAM: &str = "Unknown";

/// Headline counts for a list of classified bugs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugMetrics {
    pub total: usize,
    pub resolved: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Mean created→resolved time over issues carrying both timestamps.
    pub avg_resolution_days: f64,
    pub by_portfolio: BTreeMap<String, usize>,
    pub by_team: BTreeMap<String, usize>,
}

pub fn bug_metrics(issues: &[ClassifiedIssue]) -> BugMetrics {
    let mut metrics = BugMetrics {
        total: issues.len(),
        ..Default::default()
    };
    let mut resolution_days = 0.0;
    let mut resolution_count = 0usize;

    for item in issues {
        let issue = &item.issue;
        if issue.status.category == DONE_CATEGORY {
            metrics.resolved += 1;
        }
        match issue.priority.name.to_lowercase().as_str() {
            "critical" | "highest" | "blocker" => metrics.critical += 1,
            "high" => metrics.high += 1,
            "medium" => metrics.medium += 1,
            "low" | "lowest" => metrics.low += 1,
            _ => {}
        }

        let created = parse_jira_timestamp(&issue.created);
        let resolved = issue.resolved.as_deref().and_then(parse_jira_timestamp);
        if let (Some(created), Some(resolved)) = (created, resolved) {
            resolution_days += (resolved - created).num_seconds() as f64 / 86_400.0;
            resolution_count += 1;
        }

        *metrics.by_portfolio.entry(item.portfolio.clone()).or_default() += 1;
        let team = item.team.clone().unwrap_or_else(|| UNKNOWN_TEAM.to_string());
        *metrics.by_team.entry(team).or_default() += 1;
    }

    if resolution_count > 0 {
        metrics.avg_resolution_days = resolution_days / resolution_count as f64;
    }
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Issue;

    fn bug(priority: &str, category: Option<&str>, created: &str, resolved: Option<&str>) -> ClassifiedIssue {
        let mut issue = Issue::default();
        issue.priority.name = priority.to_string();
        issue.status.category = category.unwrap_or_default().to_string();
        issue.created = created.to_string();
        issue.resolved = resolved.map(str::to_string);
        ClassifiedIssue {
            issue,
            team: None,
            portfolio: "CORE".to_string(),
        }
    }

    #[test]
    fn test_priority_and_resolution_counts() {
        let mut issues = vec![
            bug("Critical", Some("Done"), "2025-04-01T00:00:00.000+0000", Some("2025-04-03T00:00:00.000+0000")),
            bug("High", Some("Done"), "2025-04-01T00:00:00.000+0000", Some("2025-04-05T00:00:00.000+0000")),
            bug("medium", Some("In Progress"), "2025-04-01T00:00:00.000+0000", None),
            bug("Low", None, "", None),
            bug("None", None, "2025-04-01", None),
        ];
        issues[1].team = Some("Connectors".to_string());
        issues[2].portfolio = "UI".to_string();

        let m = bug_metrics(&issues);
        assert_eq!(m.total, 5);
        assert_eq!(m.resolved, 2);
        assert_eq!((m.critical, m.high, m.medium, m.low), (1, 1, 1, 1));
        assert!((m.avg_resolution_days - 3.0).abs() < 1e-9);
        assert_eq!(m.by_portfolio.get("CORE"), Some(&4));
        assert_eq!(m.by_portfolio.get("UI"), Some(&1));
        assert_eq!(m.by_team.get("Connectors"), Some(&1));
        assert_eq!(m.by_team.get("Unknown"), Some(&4));
    }

    #[test]
    fn test_empty_metrics() {
        let m = bug_metrics(&[]);
        assert_eq!(m, BugMetrics::default());
    }
}
