//! Backlog strategy: named delivery buckets driven entirely by the backlog
//! rule table. Each bucket matches on any of its manager groups, team ids,
//! assignee ids or projects, unless a guard group disqualifies it.

use super::cascade::{Cascade, Rule, Signals};
use crate::reference::schema::{BacklogTable, BucketRule};

fn contains(list: &[String], value: Option<&str>) -> bool {
    value.is_some_and(|v| list.iter().any(|x| x == v))
}

impl Rule for BucketRule {
    fn name(&self) -> &str {
        &self.label
    }

    fn apply(&self, signals: &Signals<'_>) -> Option<String> {
        if contains(&self.unless_manager_groups, signals.manager_group) {
            return None;
        }
        let any = &self.any_of;
        let project_hit = signals
            .project_key
            .is_some_and(|p| any.projects.iter().any(|x| x.eq_ignore_ascii_case(p)));
        let hit = contains(&any.manager_groups, signals.manager_group)
            || contains(&any.teams, signals.team.as_deref())
            || contains(&any.assignees, signals.assignee_id)
            || project_hit;
        hit.then(|| self.label.clone())
    }
}

pub fn backlog_cascade(table: &BacklogTable) -> Cascade {
    let rules: Vec<Box<dyn Rule>> = table
        .rules
        .iter()
        .cloned()
        .map(|rule| Box::new(rule) as Box<dyn Rule>)
        .collect();
    Cascade::new(rules, table.fallback.clone())
}

#[cfg(test)]
mod tests {
    use crate::classify::test_support::{classifier, issue};
    use crate::classify::Strategy;
    use crate::types::Issue;

    const CORE_TEAM: &str = "ec347d75-9818-4241-a555-1780ca88e974";

    fn backlog(i: &Issue) -> String {
        classifier().classify(Strategy::Backlog, i).portfolio
    }

    #[test]
    fn test_rule_order_matches_table() {
        let c = classifier();
        assert_eq!(
            c.rule_names(Strategy::Backlog),
            vec![
                "Jegadeesh Core",
                "Jegadeesh UI",
                "Mujtaba",
                "Diksha",
                "KK AI/ML",
                "KK DevOps",
                "Fayaz"
            ]
        );
    }

    #[test]
    fn test_jegadeesh_core_by_group_and_by_team() {
        assert_eq!(backlog(&issue().manager_group("Subhan_Reportees").build()), "Jegadeesh Core");
        assert_eq!(backlog(&issue().team(CORE_TEAM).build()), "Jegadeesh Core");
    }

    #[test]
    fn test_guard_sends_mujtaba_group_past_core_team() {
        let i = issue().manager_group("Mujtaba_Reportees").team(CORE_TEAM).build();
        assert_eq!(backlog(&i), "Mujtaba");
    }

    #[test]
    fn test_jegadeesh_ui() {
        assert_eq!(backlog(&issue().manager_group("Ashok_Reportees").build()), "Jegadeesh UI");
    }

    #[test]
    fn test_mujtaba_by_assignee() {
        let i = issue()
            .assignee("557058:2e83fd32-af90-4830-855a-77cd3bdb2fe9", "Someone")
            .build();
        assert_eq!(backlog(&i), "Mujtaba");
    }

    #[test]
    fn test_diksha_by_group_and_assignee() {
        assert_eq!(backlog(&issue().manager_group("Swat_Reportees").build()), "Diksha");
        let i = issue().assignee("5dad4ba0fb31ca0c35c00866", "Someone").build();
        assert_eq!(backlog(&i), "Diksha");
    }

    #[test]
    fn test_krishna_group_without_team() {
        let i = issue().manager_group("Krishna_Reportees").build();
        assert_eq!(backlog(&i), "KK AI/ML");
        let triage = classifier().classify(Strategy::Triage, &i);
        assert_eq!(triage.portfolio, "AI/ML");
    }

    #[test]
    fn test_kk_devops_by_group_project_and_assignee() {
        assert_eq!(backlog(&issue().manager_group("Lincu_Reportees").build()), "KK DevOps");
        assert_eq!(backlog(&issue().project("DEVOPS").build()), "KK DevOps");
        let i = issue()
            .assignee("557058:e8cbfef4-ca75-4979-a160-f2c1f33b3109", "Someone")
            .build();
        assert_eq!(backlog(&i), "KK DevOps");
    }

    #[test]
    fn test_earlier_bucket_wins_over_project() {
        let i = issue().manager_group("Ajit_Reportees").project("DEVOPS").build();
        assert_eq!(backlog(&i), "KK AI/ML");
    }

    #[test]
    fn test_fayaz_bucket() {
        assert_eq!(backlog(&issue().manager_group("Komal_Reportees").build()), "Fayaz");
        assert_eq!(backlog(&issue().manager_group("Fayaz_Reportees").build()), "Fayaz");
    }

    #[test]
    fn test_no_manager_group_is_non_engineering() {
        assert_eq!(backlog(&issue().team("Flow Builder").build()), "Non Engineering");
        assert_eq!(backlog(&issue().build()), "Non Engineering");
    }

    #[test]
    fn test_unlisted_group_is_non_engineering() {
        assert_eq!(
            backlog(&issue().manager_group("Gurramkonda_Reportees").build()),
            "Non Engineering"
        );
    }

    #[test]
    fn test_backlog_ignores_person_names() {
        // Person heuristics belong to the triage strategy only.
        let i = issue().assignee("id-x", "Ajit Kumar").build();
        assert_eq!(backlog(&i), "Non Engineering");
        assert_eq!(classifier().classify(Strategy::Triage, &i).portfolio, "AI/ML");
    }
}
