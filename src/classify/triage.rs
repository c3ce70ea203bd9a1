//! Triage strategy: the engineering-org portfolio used by the release and
//! trend dashboards.
//!
//! Steps, first hit wins:
//! 1. DevOps project or issue key prefix
//! 2. Resolved team portfolio (team other than the unknown sentinel)
//! 3. Assignee/reporter name matched to a manager group
//! 4. Manager group field in the flat manager-group table
//! 5. Fallback label

use super::cascade::{Cascade, Rule, Signals};
use crate::reference::schema::{DevOpsRule, TriageTable};

#[derive(Debug, Clone)]
pub enum TriageRule {
    DevOps(DevOpsRule),
    TeamPortfolio { unknown_team: String },
    PersonManager,
    ManagerGroupTable,
}

impl Rule for TriageRule {
    fn name(&self) -> &str {
        match self {
            TriageRule::DevOps(_) => "devops",
            TriageRule::TeamPortfolio { .. } => "team",
            TriageRule::PersonManager => "person",
            TriageRule::ManagerGroupTable => "manager_group",
        }
    }

    fn apply(&self, signals: &Signals<'_>) -> Option<String> {
        match self {
            TriageRule::DevOps(rule) => {
                let project_hit = signals
                    .project_key
                    .is_some_and(|p| p.eq_ignore_ascii_case(&rule.project_key));
                let key_hit = signals.issue.key.starts_with(&rule.issue_key_prefix);
                (project_hit || key_hit).then(|| rule.portfolio.clone())
            }
            TriageRule::TeamPortfolio { unknown_team } => {
                let team = signals.team.as_deref()?;
                if team == unknown_team {
                    return None;
                }
                signals.resolvers.teams.resolve_portfolio_for_team(team)
            }
            TriageRule::PersonManager => signals
                .resolvers
                .managers
                .resolve_portfolio_for_person(signals.issue)
                .map(|m| m.portfolio),
            TriageRule::ManagerGroupTable => {
                let group = signals.manager_group?;
                signals
                    .resolvers
                    .portfolio_for_flat_group(group)
                    .map(str::to_string)
            }
        }
    }
}

pub fn triage_cascade(table: &TriageTable) -> Cascade {
    Cascade::new(
        vec![
            Box::new(TriageRule::DevOps(table.devops.clone())),
            Box::new(TriageRule::TeamPortfolio {
                unknown_team: table.unknown_team.clone(),
            }),
            Box::new(TriageRule::PersonManager),
            Box::new(TriageRule::ManagerGroupTable),
        ],
        table.fallback.clone(),
    )
}
