use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Raw Jira search payload
// =============================================================================

/// One page of `GET /rest/api/3/search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchPage {
    #[serde(default)]
    pub issues: Vec<RawIssue>,
    #[serde(default)]
    pub total: Option<u32>,
}

/// An issue as Jira returns it. Only the requested fields are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawIssue {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: RawFields,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFields {
    pub summary: Option<String>,
    pub status: Option<RawStatus>,
    pub priority: Option<RawPriority>,
    pub assignee: Option<RawUser>,
    pub reporter: Option<RawUser>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub resolutiondate: Option<String>,
    pub labels: Option<Vec<String>>,
    pub components: Option<Vec<RawNamed>>,
    pub fix_versions: Option<Vec<RawVersion>>,
    pub project: Option<RawProject>,
    /// Team field. Seen as a string, `{value}`, `{displayName}` or `{name}`.
    #[serde(rename = "customfield_12000")]
    pub customfield_12000: Option<Value>,
    /// Manager group field, `{name: "<Person>_Reportees"}`.
    #[serde(rename = "customfield_15072")]
    pub customfield_15072: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatus {
    #[serde(default)]
    pub name: String,
    pub status_category: Option<RawNamed>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPriority {
    pub name: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    pub account_id: Option<String>,
    pub display_name: Option<String>,
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNamed {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVersion {
    #[serde(default)]
    pub name: String,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProject {
    #[serde(default)]
    pub key: String,
}

// =============================================================================
// Dashboard issue model
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueStatus {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePriority {
    pub name: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixVersion {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

/// A bug normalized from Jira. Timestamps stay in Jira's wire format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub key: String,
    pub summary: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub assignee: Option<Person>,
    pub reporter: Option<Person>,
    pub created: String,
    pub updated: String,
    pub resolved: Option<String>,
    pub labels: Vec<String>,
    pub components: Vec<String>,
    pub fix_versions: Vec<FixVersion>,
    pub project_key: Option<String>,
    pub manager_group: Option<String>,
    /// Raw team field, kept for classification only.
    #[serde(skip)]
    pub team_field: Option<Value>,
}

impl From<RawUser> for Person {
    fn from(user: RawUser) -> Self {
        Self {
            account_id: user.account_id,
            display_name: user.display_name.unwrap_or_default(),
            email_address: user.email_address,
        }
    }
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        let f = raw.fields;
        let status = f.status.unwrap_or_default();
        let priority = f.priority.unwrap_or_default();
        let manager_group = f
            .customfield_15072
            .as_ref()
            .and_then(|v| v.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            id: raw.id,
            key: raw.key,
            summary: f.summary.unwrap_or_default(),
            status: IssueStatus {
                name: status.name,
                category: status.status_category.map(|c| c.name).unwrap_or_default(),
            },
            priority: IssuePriority {
                name: priority.name.unwrap_or_else(|| "None".to_string()),
                icon_url: priority.icon_url.unwrap_or_default(),
            },
            assignee: f.assignee.map(Person::from),
            reporter: f.reporter.map(Person::from),
            created: f.created.unwrap_or_default(),
            updated: f.updated.unwrap_or_default(),
            resolved: f.resolutiondate,
            labels: f.labels.unwrap_or_default(),
            components: f
                .components
                .unwrap_or_default()
                .into_iter()
                .map(|c| c.name)
                .collect(),
            fix_versions: f
                .fix_versions
                .unwrap_or_default()
                .into_iter()
                .map(|v| FixVersion {
                    name: v.name,
                    release_date: v.release_date,
                })
                .collect(),
            project_key: f.project.map(|p| p.key).filter(|k| !k.is_empty()),
            manager_group,
            team_field: f.customfield_12000.filter(|v| !v.is_null()),
        }
    }
}

/// An issue with its extracted team and the portfolio chosen by a cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedIssue {
    #[serde(flatten)]
    pub issue: Issue,
    pub team: Option<String>,
    pub portfolio: String,
}
