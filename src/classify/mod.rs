//! Portfolio classification.
//!
//! Two strategies share one set of extractors and resolvers:
//! - `Triage` maps bugs onto the engineering-org portfolios (CORE, UI, ...).
//! - `Backlog` maps bugs onto the named backlog delivery buckets.
//!
//! The two taxonomies disagree on purpose. Both are ordered rule lists run by
//! the same [`cascade::Cascade`] evaluator, and both are pure functions of
//! the issue plus the reference tables loaded at start-up.

pub mod backlog;
pub mod cascade;
pub mod fields;
pub mod managers;
pub mod teams;
pub mod triage;

use serde::{Deserialize, Serialize};

use crate::reference::ReferenceTables;
use crate::types::{ClassifiedIssue, Issue};
use cascade::{Cascade, Decision, Resolvers, Signals};
use managers::ManagerResolver;
use teams::TeamResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Triage,
    Backlog,
}

#[derive(Debug)]
pub struct Classifier {
    resolvers: Resolvers,
    triage: Cascade,
    backlog: Cascade,
}

impl Classifier {
    pub fn new(tables: &ReferenceTables) -> Self {
        Self {
            resolvers: Resolvers {
                teams: TeamResolver::new(tables.teams.clone()),
                managers: ManagerResolver::new(tables.managers.clone()),
                manager_groups: tables.triage.manager_groups.clone(),
            },
            triage: triage::triage_cascade(&tables.triage),
            backlog: backlog::backlog_cascade(&tables.backlog),
        }
    }

    pub fn teams(&self) -> &TeamResolver {
        &self.resolvers.teams
    }

    pub fn managers(&self) -> &ManagerResolver {
        &self.resolvers.managers
    }

    fn cascade(&self, strategy: Strategy) -> &Cascade {
        match strategy {
            Strategy::Triage => &self.triage,
            Strategy::Backlog => &self.backlog,
        }
    }

    pub fn rule_names(&self, strategy: Strategy) -> Vec<&str> {
        self.cascade(strategy).rule_names()
    }

    pub fn fallback(&self, strategy: Strategy) -> &str {
        self.cascade(strategy).fallback()
    }

    fn signals<'a>(&'a self, issue: &'a Issue) -> Signals<'a> {
        Signals {
            issue,
            team: fields::extract_team(issue, &self.resolvers.teams),
            manager_group: fields::extract_manager_group(issue),
            assignee_id: fields::extract_assignee_id(issue),
            project_key: fields::extract_project_key(issue),
            resolvers: &self.resolvers,
        }
    }

    pub fn classify(&self, strategy: Strategy, issue: &Issue) -> Decision {
        self.cascade(strategy).evaluate(&self.signals(issue))
    }

    pub fn classify_issue(&self, strategy: Strategy, issue: Issue) -> ClassifiedIssue {
        let signals = self.signals(&issue);
        let decision = self.cascade(strategy).evaluate(&signals);
        let team = signals.team;
        log::debug!(
            "{} {:?} -> {} ({})",
            issue.key,
            strategy,
            decision.portfolio,
            decision.rule.as_deref().unwrap_or("fallback")
        );
        ClassifiedIssue {
            issue,
            team,
            portfolio: decision.portfolio,
        }
    }

    pub fn classify_issues(&self, strategy: Strategy, issues: Vec<Issue>) -> Vec<ClassifiedIssue> {
        issues
            .into_iter()
            .map(|issue| self.classify_issue(strategy, issue))
            .collect()
    }
}
