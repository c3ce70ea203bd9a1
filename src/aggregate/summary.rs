//! Per-portfolio summary tables for the triage and backlog views.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{parse_jira_timestamp, percentage, sort_by_display_order};
use crate::reference::schema::PortfolioOrder;
use crate::types::ClassifiedIssue;

fn group_by_portfolio(issues: &[ClassifiedIssue]) -> BTreeMap<&str, Vec<&ClassifiedIssue>> {
    let mut groups: BTreeMap<&str, Vec<&ClassifiedIssue>> = BTreeMap::new();
    for issue in issues {
        groups.entry(issue.portfolio.as_str()).or_default().push(issue);
    }
    groups
}

fn ordered_keys(groups: &BTreeMap<&str, Vec<&ClassifiedIssue>>, order: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = groups.keys().map(|k| k.to_string()).collect();
    sort_by_display_order(&mut keys, order);
    keys
}

fn distinct_groups_and_teams(issues: &[&ClassifiedIssue]) -> (Vec<String>, Vec<String>) {
    let groups: BTreeSet<String> = issues
        .iter()
        .filter_map(|i| i.issue.manager_group.clone())
        .collect();
    let teams: BTreeSet<String> = issues.iter().filter_map(|i| i.team.clone()).collect();
    (groups.into_iter().collect(), teams.into_iter().collect())
}

// =============================================================================
// Triage portfolio summary
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub portfolio: String,
    pub total_issues: usize,
    pub unresolved_issues: usize,
    pub percentage_unresolved: f64,
    pub manager_groups: Vec<String>,
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    pub total_issues: usize,
    pub unresolved_issues: usize,
    pub percentage_unresolved: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummaryTable {
    pub rows: Vec<PortfolioSummary>,
    pub totals: SummaryTotals,
}

/// Totals and unresolved counts per portfolio. An issue is unresolved when
/// its status name is not in `terminal_statuses`.
pub fn summarize_portfolios(
    issues: &[ClassifiedIssue],
    order: &[String],
    terminal_statuses: &[String],
) -> PortfolioSummaryTable {
    let groups = group_by_portfolio(issues);
    let rows: Vec<PortfolioSummary> = ordered_keys(&groups, order)
        .into_iter()
        .map(|portfolio| {
            let members = groups.get(portfolio.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            let unresolved = members
                .iter()
                .filter(|i| !terminal_statuses.contains(&i.issue.status.name))
                .count();
            let (manager_groups, teams) = distinct_groups_and_teams(members);
            PortfolioSummary {
                total_issues: members.len(),
                unresolved_issues: unresolved,
                percentage_unresolved: percentage(unresolved, members.len()),
                manager_groups,
                teams,
                portfolio,
            }
        })
        .collect();

    let total_issues = rows.iter().map(|r| r.total_issues).sum();
    let unresolved_issues = rows.iter().map(|r| r.unresolved_issues).sum();
    PortfolioSummaryTable {
        totals: SummaryTotals {
            total_issues,
            unresolved_issues,
            percentage_unresolved: percentage(unresolved_issues, total_issues),
        },
        rows,
    }
}

// =============================================================================
// Backlog summary
// =============================================================================

/// Disjoint age bands by creation date relative to `now`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBuckets {
    pub within_30_days: usize,
    pub within_60_days: usize,
    pub within_180_days: usize,
    pub within_365_days: usize,
    pub over_365_days: usize,
    /// Created timestamp missing or unparseable.
    pub undated: usize,
}

impl AgeBuckets {
    fn add(&mut self, created: &str, now: DateTime<Utc>) {
        let Some(created) = parse_jira_timestamp(created) else {
            self.undated += 1;
            return;
        };
        let age = now - created;
        if age <= Duration::days(30) {
            self.within_30_days += 1;
        } else if age <= Duration::days(60) {
            self.within_60_days += 1;
        } else if age <= Duration::days(180) {
            self.within_180_days += 1;
        } else if age <= Duration::days(365) {
            self.within_365_days += 1;
        } else {
            self.over_365_days += 1;
        }
    }

    fn merge(&mut self, other: &AgeBuckets) {
        self.within_30_days += other.within_30_days;
        self.within_60_days += other.within_60_days;
        self.within_180_days += other.within_180_days;
        self.within_365_days += other.within_365_days;
        self.over_365_days += other.over_365_days;
        self.undated += other.undated;
    }
}

pub fn age_buckets<'a>(
    issues: impl IntoIterator<Item = &'a ClassifiedIssue>,
    now: DateTime<Utc>,
) -> AgeBuckets {
    let mut buckets = AgeBuckets::default();
    for issue in issues {
        buckets.add(&issue.issue.created, now);
    }
    buckets
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogPortfolioSummary {
    pub portfolio: String,
    pub total_issues: usize,
    pub age: AgeBuckets,
    pub manager_groups: Vec<String>,
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogTotals {
    pub total_issues: usize,
    pub age: AgeBuckets,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Engineering vs Non-Engineering split, plus the per-bucket breakdown of the
/// Engineering share.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogSegments {
    pub engineering: Segment,
    pub non_engineering: Segment,
    pub engineering_breakdown: Vec<Segment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogSummary {
    pub rows: Vec<BacklogPortfolioSummary>,
    pub totals: BacklogTotals,
    pub segments: BacklogSegments,
}

pub fn segments(issues: &[ClassifiedIssue], engineering: &[String]) -> BacklogSegments {
    let total = issues.len();
    let eng_count = issues
        .iter()
        .filter(|i| engineering.contains(&i.portfolio))
        .count();
    let breakdown = engineering
        .iter()
        .map(|label| {
            let count = issues.iter().filter(|i| &i.portfolio == label).count();
            Segment {
                label: label.clone(),
                count,
                percentage: percentage(count, eng_count),
            }
        })
        .collect();

    BacklogSegments {
        engineering: Segment {
            label: "Engineering".to_string(),
            count: eng_count,
            percentage: percentage(eng_count, total),
        },
        non_engineering: Segment {
            label: "Non-Engineering".to_string(),
            count: total - eng_count,
            percentage: percentage(total - eng_count, total),
        },
        engineering_breakdown: breakdown,
    }
}

pub fn summarize_backlog(
    issues: &[ClassifiedIssue],
    portfolios: &PortfolioOrder,
    now: DateTime<Utc>,
) -> BacklogSummary {
    let groups = group_by_portfolio(issues);
    let mut totals = BacklogTotals::default();

    let rows: Vec<BacklogPortfolioSummary> = ordered_keys(&groups, &portfolios.backlog_order)
        .into_iter()
        .map(|portfolio| {
            let members = groups.get(portfolio.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            let age = age_buckets(members.iter().copied(), now);
            totals.total_issues += members.len();
            totals.age.merge(&age);
            let (manager_groups, teams) = distinct_groups_and_teams(members);
            BacklogPortfolioSummary {
                portfolio,
                total_issues: members.len(),
                age,
                manager_groups,
                teams,
            }
        })
        .collect();

    BacklogSummary {
        rows,
        totals,
        segments: segments(issues, &portfolios.engineering),
    }
}
