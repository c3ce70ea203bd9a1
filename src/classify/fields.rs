//! Classification inputs read off a normalized issue.
//!
//! Every extractor is absent-safe: a missing or oddly shaped field yields
//! `None`, never an error.

use serde_json::Value;

use super::teams::TeamResolver;
use crate::types::Issue;

/// Team name from the team field.
///
/// Accepts a plain string or an object carrying `value`, `displayName` or
/// `name` (first non-empty string wins). A value the resolver knows is
/// returned as-is; otherwise the first table key it fuzzy-matches; otherwise
/// the raw value unchanged.
pub fn extract_team(issue: &Issue, teams: &TeamResolver) -> Option<String> {
    let raw = team_field_text(issue.team_field.as_ref()?)?;
    if raw.is_empty() {
        return None;
    }
    if teams.resolve_portfolio_for_team(&raw).is_some() {
        return Some(raw);
    }
    if let Some(team) = teams.matching_team(&raw) {
        return Some(team.to_string());
    }
    Some(raw)
}

fn team_field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()).filter(|s| !s.is_empty()),
        Value::Object(map) => ["value", "displayName", "name"]
            .iter()
            .filter_map(|k| map.get(*k).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

pub fn extract_manager_group(issue: &Issue) -> Option<&str> {
    issue.manager_group.as_deref().filter(|g| !g.is_empty())
}

pub fn extract_assignee_id(issue: &Issue) -> Option<&str> {
    issue
        .assignee
        .as_ref()
        .and_then(|a| a.account_id.as_deref())
        .filter(|id| !id.is_empty())
}

pub fn extract_project_key(issue: &Issue) -> Option<&str> {
    issue.project_key.as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::schema::TeamEntry;
    use crate::types::Person;
    use serde_json::json;

    fn teams() -> TeamResolver {
        TeamResolver::new(vec![
            TeamEntry {
                team: "Flow Builder".to_string(),
                portfolios: vec!["CORE".to_string()],
            },
            TeamEntry {
                team: "AI Copilot".to_string(),
                portfolios: vec!["AI/ML".to_string()],
            },
        ])
    }

    fn with_team(value: Value) -> Issue {
        Issue {
            team_field: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_team_from_plain_string() {
        assert_eq!(
            extract_team(&with_team(json!("Flow Builder")), &teams()).as_deref(),
            Some("Flow Builder")
        );
    }

    #[test]
    fn test_extract_team_object_shapes() {
        let t = teams();
        for value in [
            json!({ "value": "AI Copilot" }),
            json!({ "displayName": "AI Copilot" }),
            json!({ "name": "AI Copilot" }),
            json!({ "id": 7, "value": "AI Copilot", "name": "ignored" }),
        ] {
            assert_eq!(extract_team(&with_team(value), &t).as_deref(), Some("AI Copilot"));
        }
    }

    #[test]
    fn test_extract_team_skips_empty_shapes() {
        let t = teams();
        assert_eq!(
            extract_team(&with_team(json!({ "value": "", "displayName": "AI Copilot" })), &t).as_deref(),
            Some("AI Copilot")
        );
        assert_eq!(
            extract_team(&with_team(json!({ "value": "", "displayName": "", "name": "Flow Builder" })), &t)
                .as_deref(),
            Some("Flow Builder")
        );
        assert_eq!(extract_team(&with_team(json!({ "value": "", "name": "" })), &t), None);
    }

    #[test]
    fn test_extract_team_keeps_known_raw_value() {
        // Resolvable by fuzzy match, so the raw spelling survives.
        assert_eq!(
            extract_team(&with_team(json!("flow builder team")), &teams()).as_deref(),
            Some("flow builder team")
        );
    }

    #[test]
    fn test_extract_team_unknown_value_returned_unchanged() {
        assert_eq!(
            extract_team(&with_team(json!("Payments Squad")), &teams()).as_deref(),
            Some("Payments Squad")
        );
    }

    #[test]
    fn test_extract_team_absent_or_unusable() {
        let t = teams();
        assert_eq!(extract_team(&Issue::default(), &t), None);
        assert_eq!(extract_team(&with_team(json!(42)), &t), None);
        assert_eq!(extract_team(&with_team(json!({ "id": 1 })), &t), None);
        assert_eq!(extract_team(&with_team(json!("")), &t), None);
    }

    #[test]
    fn test_straight_field_reads() {
        let issue = Issue {
            manager_group: Some("Ajit_Reportees".to_string()),
            project_key: Some("IO".to_string()),
            assignee: Some(Person {
                account_id: Some("557058:abc".to_string()),
                display_name: "A".to_string(),
                email_address: None,
            }),
            ..Default::default()
        };
        assert_eq!(extract_manager_group(&issue), Some("Ajit_Reportees"));
        assert_eq!(extract_project_key(&issue), Some("IO"));
        assert_eq!(extract_assignee_id(&issue), Some("557058:abc"));

        let empty = Issue::default();
        assert_eq!(extract_manager_group(&empty), None);
        assert_eq!(extract_project_key(&empty), None);
        assert_eq!(extract_assignee_id(&empty), None);
    }
}
