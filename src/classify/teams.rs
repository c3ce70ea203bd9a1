//! Team name → portfolio resolution.

use std::collections::BTreeSet;

use crate::reference::schema::TeamEntry;

/// Ordered team table. Row order decides fuzzy-match ties.
#[derive(Debug, Clone)]
pub struct TeamResolver {
    entries: Vec<TeamEntry>,
}

impl TeamResolver {
    pub fn new(entries: Vec<TeamEntry>) -> Self {
        Self { entries }
    }

    /// Portfolio for a team name: exact key first, then case-insensitive
    /// substring containment in either direction, first row wins.
    pub fn resolve_portfolio_for_team(&self, name: &str) -> Option<String> {
        self.lookup(name)
            .and_then(|entry| entry.portfolios.first().cloned())
    }

    /// The table key a free-text team name fuzzy-matches, if any.
    pub fn matching_team(&self, name: &str) -> Option<&str> {
        let needle = normalize(name)?;
        self.entries
            .iter()
            .find(|entry| fuzzy_eq(&needle, &entry.team))
            .map(|entry| entry.team.as_str())
    }

    fn lookup(&self, name: &str) -> Option<&TeamEntry> {
        if name.is_empty() {
            return None;
        }
        if let Some(entry) = self.entries.iter().find(|e| e.team == name) {
            return Some(entry);
        }
        let needle = normalize(name)?;
        self.entries.iter().find(|e| fuzzy_eq(&needle, &e.team))
    }

    pub fn teams_for_portfolio(&self, portfolio: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.portfolios.iter().any(|p| p == portfolio))
            .map(|e| e.team.clone())
            .collect()
    }

    /// Sorted, distinct.
    pub fn all_portfolios(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| e.portfolios.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn all_teams(&self) -> Vec<String> {
        let mut teams: Vec<String> = self.entries.iter().map(|e| e.team.clone()).collect();
        teams.sort();
        teams
    }
}

fn normalize(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn fuzzy_eq(needle: &str, team: &str) -> bool {
    let team = team.to_lowercase();
    needle.contains(&team) || team.contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(team: &str, portfolios: &[&str]) -> TeamEntry {
        TeamEntry {
            team: team.to_string(),
            portfolios: portfolios.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn resolver() -> TeamResolver {
        TeamResolver::new(vec![
            entry("Core Team X", &["CORE"]),
            entry("UI Framework", &["UI"]),
            entry("Framework", &["Platform"]),
            entry("Release Engineering", &["DevOps", "Platform"]),
        ])
    }

    #[test]
    fn test_exact_match_returns_first_portfolio() {
        let r = resolver();
        assert_eq!(r.resolve_portfolio_for_team("Release Engineering").as_deref(), Some("DevOps"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let r = resolver();
        assert_eq!(
            r.resolve_portfolio_for_team("Core Team X"),
            r.resolve_portfolio_for_team("core team x")
        );
        assert_eq!(r.resolve_portfolio_for_team("  CORE TEAM X ").as_deref(), Some("CORE"));
    }

    #[test]
    fn test_query_containing_team_matches() {
        let r = resolver();
        assert_eq!(r.resolve_portfolio_for_team("Core Team X - Pune").as_deref(), Some("CORE"));
    }

    #[test]
    fn test_team_containing_query_matches() {
        let r = resolver();
        assert_eq!(r.resolve_portfolio_for_team("release eng").as_deref(), Some("DevOps"));
    }

    #[test]
    fn test_fuzzy_tie_break_is_table_order() {
        // "framework" is contained in both "UI Framework" and "Framework"; UI row comes first.
        let r = resolver();
        assert_eq!(r.resolve_portfolio_for_team("framework").as_deref(), Some("UI"));
        assert_eq!(r.matching_team("framework"), Some("UI Framework"));
    }

    #[test]
    fn test_exact_match_beats_earlier_fuzzy_row() {
        let r = resolver();
        assert_eq!(r.resolve_portfolio_for_team("Framework").as_deref(), Some("Platform"));
    }

    #[test]
    fn test_empty_and_unknown_names() {
        let r = resolver();
        assert_eq!(r.resolve_portfolio_for_team(""), None);
        assert_eq!(r.resolve_portfolio_for_team("   "), None);
        assert_eq!(r.resolve_portfolio_for_team("Payments"), None);
    }

    #[test]
    fn test_listing_helpers() {
        let r = resolver();
        assert_eq!(r.teams_for_portfolio("Platform"), vec!["Framework", "Release Engineering"]);
        assert_eq!(r.all_portfolios(), vec!["CORE", "DevOps", "Platform", "UI"]);
        assert_eq!(
            r.all_teams(),
            vec!["Core Team X", "Framework", "Release Engineering", "UI Framework"]
        );
    }
}
