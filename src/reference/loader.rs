use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::embedded::{
    self, BACKLOG_FILE, MANAGERS_FILE, PORTFOLIOS_FILE, RELEASES_FILE, TEAMS_FILE, TRIAGE_FILE,
};
use super::schema::{
    BacklogTable, ManagerTable, PortfolioOrder, ReferenceTables, ReleaseCalendar, TeamEntry,
    TriageTable,
};
use super::ReferenceError;

/// Load every reference table, preferring files in `override_dir` when present.
pub fn load_tables(override_dir: Option<&Path>) -> Result<ReferenceTables, ReferenceError> {
    let tables = ReferenceTables {
        teams: parse_table::<Vec<TeamEntry>>(TEAMS_FILE, override_dir)?,
        managers: parse_table::<ManagerTable>(MANAGERS_FILE, override_dir)?,
        triage: parse_table::<TriageTable>(TRIAGE_FILE, override_dir)?,
        backlog: parse_table::<BacklogTable>(BACKLOG_FILE, override_dir)?,
        portfolios: parse_table::<PortfolioOrder>(PORTFOLIOS_FILE, override_dir)?,
        releases: parse_table::<ReleaseCalendar>(RELEASES_FILE, override_dir)?,
    };
    validate_tables(&tables)?;
    Ok(tables)
}

fn parse_table<T: DeserializeOwned>(
    file: &str,
    override_dir: Option<&Path>,
) -> Result<T, ReferenceError> {
    let content = read_table(file, override_dir)?;
    serde_json::from_str(&content).map_err(|source| ReferenceError::Parse {
        file: file.to_string(),
        source,
    })
}

fn read_table(file: &str, override_dir: Option<&Path>) -> Result<String, ReferenceError> {
    if let Some(dir) = override_dir {
        let path = dir.join(file);
        if path.exists() {
            log::info!("Loading reference table override {}", path.display());
            return std::fs::read_to_string(&path).map_err(|source| ReferenceError::Read {
                file: path.display().to_string(),
                source,
            });
        }
    }
    embedded::get_embedded(file)
        .map(str::to_string)
        .ok_or_else(|| ReferenceError::UnknownTable(file.to_string()))
}

/// Validate cross-table invariants the classifier relies on.
pub fn validate_tables(tables: &ReferenceTables) -> Result<(), ReferenceError> {
    for entry in &tables.teams {
        if entry.team.trim().is_empty() {
            return Err(ReferenceError::invalid(TEAMS_FILE, "team name is required"));
        }
        if entry.portfolios.is_empty() {
            return Err(ReferenceError::invalid(
                TEAMS_FILE,
                format!("team '{}' has no portfolio", entry.team),
            ));
        }
    }

    let suffix = &tables.managers.suffix;
    for entry in &tables.managers.groups {
        if !entry.group.ends_with(suffix.as_str()) || entry.group.len() == suffix.len() {
            return Err(ReferenceError::invalid(
                MANAGERS_FILE,
                format!("group '{}' must be <name>{}", entry.group, suffix),
            ));
        }
    }

    let devops = &tables.triage.devops;
    if devops.project_key.is_empty() || devops.issue_key_prefix.is_empty() {
        return Err(ReferenceError::invalid(
            TRIAGE_FILE,
            "devops project key and issue key prefix are required",
        ));
    }

    for rule in &tables.backlog.rules {
        if rule.label.is_empty() {
            return Err(ReferenceError::invalid(BACKLOG_FILE, "bucket label is required"));
        }
        if rule.any_of.is_empty() {
            return Err(ReferenceError::invalid(
                BACKLOG_FILE,
                format!("bucket '{}' matches nothing", rule.label),
            ));
        }
    }

    let portfolios = &tables.portfolios;
    if portfolios.triage_order.is_empty() || portfolios.backlog_order.is_empty() {
        return Err(ReferenceError::invalid(
            PORTFOLIOS_FILE,
            "display orders must not be empty",
        ));
    }
    for label in &portfolios.engineering {
        if !tables.backlog.rules.iter().any(|r| &r.label == label) {
            return Err(ReferenceError::invalid(
                PORTFOLIOS_FILE,
                format!("engineering segment '{}' is not a backlog bucket", label),
            ));
        }
    }

    let calendar = &tables.releases;
    let mut names = HashSet::new();
    for release in &calendar.releases {
        if !names.insert(release.name.as_str()) {
            return Err(ReferenceError::invalid(
                RELEASES_FILE,
                format!("duplicate release '{}'", release.name),
            ));
        }
        if release.created_from > release.created_to || release.period_start > release.period_end
        {
            return Err(ReferenceError::invalid(
                RELEASES_FILE,
                format!("release '{}' has an inverted date range", release.name),
            ));
        }
    }
    if !names.contains(calendar.default_release.as_str()) {
        return Err(ReferenceError::invalid(
            RELEASES_FILE,
            format!("default release '{}' is not defined", calendar.default_release),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_tables() {
        let tables = load_tables(None).expect("embedded tables should load");
        assert!(!tables.teams.is_empty());
        assert_eq!(tables.managers.suffix, "_Reportees");
        assert_eq!(tables.triage.devops.portfolio, "DevOps");
        assert_eq!(tables.backlog.fallback, "Non Engineering");
        assert_eq!(tables.backlog.rules.len(), 7);
        assert_eq!(tables.releases.default_release, "april");
        assert_eq!(tables.releases.releases.len(), 4);
    }

    #[test]
    fn test_every_embedded_table_parses_as_json() {
        for name in embedded::table_names() {
            let json = embedded::get_embedded(name).unwrap();
            serde_json::from_str::<serde_json::Value>(json)
                .unwrap_or_else(|e| panic!("{} is not valid JSON: {}", name, e));
        }
    }

    #[test]
    fn test_triage_table_is_superset_of_person_table() {
        let tables = load_tables(None).unwrap();
        for entry in &tables.managers.groups {
            assert!(
                tables
                    .triage
                    .manager_groups
                    .iter()
                    .any(|flat| flat.group == entry.group),
                "{} missing from triage table",
                entry.group
            );
        }
    }

    #[test]
    fn test_override_dir_replaces_single_table() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(TEAMS_FILE),
            r#"[{ "team": "Night Shift", "portfolios": ["QA"] }]"#,
        )
        .unwrap();

        let tables = load_tables(Some(dir.path())).unwrap();
        assert_eq!(tables.teams.len(), 1);
        assert_eq!(tables.teams[0].team, "Night Shift");
        // Untouched tables still come from the embedded copy.
        assert_eq!(tables.backlog.rules.len(), 7);
    }

    #[test]
    fn test_override_with_bad_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BACKLOG_FILE), "{ not json").unwrap();

        let err = load_tables(Some(dir.path())).unwrap_err();
        assert!(matches!(err, ReferenceError::Parse { .. }));
    }

    #[test]
    fn test_validate_rejects_team_without_portfolio() {
        let mut tables = load_tables(None).unwrap();
        tables.teams.push(TeamEntry {
            team: "Orphans".to_string(),
            portfolios: vec![],
        });
        assert!(validate_tables(&tables).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_bucket() {
        let mut tables = load_tables(None).unwrap();
        tables.backlog.rules[0].any_of = Default::default();
        let err = validate_tables(&tables).unwrap_err();
        assert!(err.to_string().contains("matches nothing"));
    }

    #[test]
    fn test_validate_rejects_unknown_default_release() {
        let mut tables = load_tables(None).unwrap();
        tables.releases.default_release = "december".to_string();
        assert!(validate_tables(&tables).is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_manager_group() {
        let mut tables = load_tables(None).unwrap();
        tables.managers.groups[0].group = "Ajit".to_string();
        assert!(validate_tables(&tables).is_err());
    }

    #[test]
    fn test_validate_rejects_engineering_label_without_bucket() {
        let mut tables = load_tables(None).unwrap();
        let fayaz = tables.portfolios.engineering.iter_mut().find(|l| *l == "Fayaz").unwrap();
        *fayaz = "Fayaz QA".to_string();
        let err = validate_tables(&tables).unwrap_err();
        assert!(err.to_string().contains("'Fayaz QA' is not a backlog bucket"));
    }
}
