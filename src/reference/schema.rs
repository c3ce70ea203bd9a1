use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Every reference table the classifier, release calendar and aggregator need.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub teams: Vec<TeamEntry>,
    pub managers: ManagerTable,
    pub triage: TriageTable,
    pub backlog: BacklogTable,
    pub portfolios: PortfolioOrder,
    pub releases: ReleaseCalendar,
}

/// One row of the team → portfolio table. Row order is the fuzzy-match tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamEntry {
    pub team: String,
    pub portfolios: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerEntry {
    pub group: String,
    pub portfolio: String,
}

/// Manager groups used for the person-name heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerTable {
    /// Suffix stripped from a group key to get the manager's first name.
    #[serde(default = "default_group_suffix")]
    pub suffix: String,
    pub groups: Vec<ManagerEntry>,
}

fn default_group_suffix() -> String {
    "_Reportees".to_string()
}

/// DevOps override: matched on project key or issue key prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevOpsRule {
    pub project_key: String,
    pub issue_key_prefix: String,
    pub portfolio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageTable {
    pub devops: DevOpsRule,
    /// Team value that never counts as a resolved team.
    pub unknown_team: String,
    pub fallback: String,
    /// Flat manager-group table; superset of `ManagerTable`.
    pub manager_groups: Vec<ManagerEntry>,
}

/// Signals a backlog bucket accepts. Any single hit selects the bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketMatch {
    #[serde(default)]
    pub manager_groups: Vec<String>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
}

impl BucketMatch {
    pub fn is_empty(&self) -> bool {
        self.manager_groups.is_empty()
            && self.teams.is_empty()
            && self.assignees.is_empty()
            && self.projects.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketRule {
    pub label: String,
    pub any_of: BucketMatch,
    /// Manager groups that disqualify this bucket even when `any_of` hits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unless_manager_groups: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogTable {
    pub fallback: String,
    pub rules: Vec<BucketRule>,
}

/// Display orders and segment membership for summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioOrder {
    pub triage_order: Vec<String>,
    pub backlog_order: Vec<String>,
    /// Backlog buckets counted as Engineering; everything else is Non-Engineering.
    pub engineering: Vec<String>,
}

/// Project set, terminal statuses and sort clause shared by a family of queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryScope {
    pub projects: Vec<String>,
    pub terminal_statuses: Vec<String>,
    pub order_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryScopes {
    pub triage: QueryScope,
    pub backlog: QueryScope,
}

/// A release and the date boundaries of every window derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub name: String,
    pub label: String,
    /// Triage and release-bug windows: bugs created in `[created_from, created_to]`.
    pub created_from: NaiveDate,
    pub created_to: NaiveDate,
    /// Trend period used for the before/addition/resolved windows.
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub backlog_cutoff: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseCalendar {
    pub default_release: String,
    pub scopes: QueryScopes,
    pub releases: Vec<Release>,
}
