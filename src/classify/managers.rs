
use crate::reference::schema::{ManagerEntry, ManagerTable};
use crate::types::Issue;

/// Result of the person-name heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonMatch {
    pub portfolio: String,
    pub manager_group: String,
}

/// Manager group → portfolio, plus the display-name heuristic.
#[derive(Debug, Clone)]
pub struct ManagerResolver {
    suffix: String,
    groups: Vec<ManagerEntry>,
}

impl ManagerResolver {
    pub fn new(table: ManagerTable) -> Self {
        Self {
            suffix: table.suffix,
            groups: table.groups,
        }
    }

    /// Exact lookup only.
    pub fn resolve_portfolio_for_manager_group(&self, group: &str) -> Option<String> {
        self.groups
            .iter()
            .find(|e| e.group == group)
            .map(|e| e.portfolio.clone())
    }

    /// Match the assignee's display name, then the reporter's, against the
    /// person part of each manager group.
    pub fn resolve_portfolio_for_person(&self, issue: &Issue) -> Option<PersonMatch> {
        let names = [
            issue.assignee.as_ref().map(|p| p.display_name.as_str()),
            issue.reporter.as_ref().map(|p| p.display_name.as_str()),
        ];
        names.into_iter().flatten().find_map(|name| self.match_name(name))
    }

    fn match_name(&self, full_name: &str) -> Option<PersonMatch> {
        if full_name.trim().is_empty() {
            return None;
        }
        let lowered = full_name.to_lowercase();
        let first = lowered.split_whitespace().next().unwrap_or_default();

        let entry = self.groups.iter().find(|entry| {
            let person = self.person_part(&entry.group);
            !person.is_empty() && (first == person || lowered.contains(&person))
        })?;

        Some(PersonMatch {
            portfolio: entry.portfolio.clone(),
            manager_group: entry.group.clone(),
        })
    }

    fn person_part(&self, group: &str) -> String {
        group
            .strip_suffix(self.suffix.as_str())
            .unwrap_or(group)
            .to_lowercase()
    }

    pub fn all_manager_groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = self.groups.iter().map(|e| e.group.clone()).collect();
        groups.sort();
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Person;

    fn resolver() -> ManagerResolver {
        let groups = [
            ("Ajit_Reportees", "AI/ML"),
            ("Raman_Reportees", "Platform"),
            ("Ramakrishna_Reportees", "CORE"),
            ("Komal_Reportees", "UI"),
        ]
        .into_iter()
        .map(|(group, portfolio)| ManagerEntry {
            group: group.to_string(),
            portfolio: portfolio.to_string(),
        })
        .collect();
        ManagerResolver::new(ManagerTable {
            suffix: "_Reportees".to_string(),
            groups,
        })
    }

    fn person(name: &str) -> Person {
        Person {
            display_name: name.to_string(),
            ..Default::default()
        }
    }

    fn issue_with(assignee: Option<&str>, reporter: Option<&str>) -> Issue {
        Issue {
            assignee: assignee.map(person),
            reporter: reporter.map(person),
            ..Default::default()
        }
    }

    #[test]
    fn test_manager_group_lookup_is_exact() {
        let r = resolver();
        assert_eq!(r.resolve_portfolio_for_manager_group("Ajit_Reportees").as_deref(), Some("AI/ML"));
        assert_eq!(r.resolve_portfolio_for_manager_group("ajit_reportees"), None);
        assert_eq!(r.resolve_portfolio_for_manager_group("Ajit"), None);
    }

    #[test]
    fn test_first_name_match() {
        let r = resolver();
        let m = r
            .resolve_portfolio_for_person(&issue_with(Some("Komal Sharma"), None))
            .unwrap();
        assert_eq!(m.portfolio, "UI");
        assert_eq!(m.manager_group, "Komal_Reportees");
    }

    #[test]
    fn test_containment_uses_table_order() {
        // Ajit is checked first and misses; Raman is contained in the surname.
        let r = resolver();
        let m = r
            .resolve_portfolio_for_person(&issue_with(Some("Venkat Ramanathan"), None))
            .unwrap();
        assert_eq!(m.manager_group, "Raman_Reportees");
    }

    #[test]
    fn test_first_token_equality_is_not_prefix() {
        let r = resolver();
        let m = r
            .resolve_portfolio_for_person(&issue_with(Some("Ramakrishna P"), None))
            .unwrap();
        assert_eq!(m.manager_group, "Ramakrishna_Reportees");
    }

    #[test]
    fn test_assignee_checked_before_reporter() {
        let r = resolver();
        let m = r
            .resolve_portfolio_for_person(&issue_with(Some("Ajit Kumar"), Some("Komal S")))
            .unwrap();
        assert_eq!(m.portfolio, "AI/ML");
    }

    #[test]
    fn test_reporter_used_when_assignee_unmatched() {
        let r = resolver();
        let m = r
            .resolve_portfolio_for_person(&issue_with(Some("John Doe"), Some("Komal S")))
            .unwrap();
        assert_eq!(m.portfolio, "UI");
    }

    #[test]
    fn test_no_people_no_match() {
        let r = resolver();
        assert_eq!(r.resolve_portfolio_for_person(&issue_with(None, None)), None);
        assert_eq!(r.resolve_portfolio_for_person(&issue_with(Some(""), Some("John Doe"))), None);
    }

    #[test]
    fn test_listing_helpers() {
        let r = resolver();
        assert_eq!(
            r.all_manager_groups(),
            vec!["Ajit_Reportees", "Komal_Reportees", "Ramakrishna_Reportees", "Raman_Reportees"]
        );
    }
}
