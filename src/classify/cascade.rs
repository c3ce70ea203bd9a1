//! First-match rule evaluation shared by every classification strategy.

use std::fmt::Debug;

use super::managers::ManagerResolver;
use super::teams::TeamResolver;
use crate::reference::schema::ManagerEntry;
use crate::types::Issue;

/// Lookup tables rules may consult.
#[derive(Debug, Clone)]
pub struct Resolvers {
    pub teams: TeamResolver,
    pub managers: ManagerResolver,
    /// Flat manager group table used by the last triage step.
    pub manager_groups: Vec<ManagerEntry>,
}

impl Resolvers {
    pub fn portfolio_for_flat_group(&self, group: &str) -> Option<&str> {
        self.manager_groups
            .iter()
            .find(|e| e.group == group)
            .map(|e| e.portfolio.as_str())
    }
}

/// Everything a rule can see about one issue. Built once per issue.
#[derive(Debug)]
pub struct Signals<'a> {
    pub issue: &'a Issue,
    pub team: Option<String>,
    pub manager_group: Option<&'a str>,
    pub assignee_id: Option<&'a str>,
    pub project_key: Option<&'a str>,
    pub resolvers: &'a Resolvers,
}

pub trait Rule: Debug + Send + Sync {
    /// Stable identifier for logs and tests.
    fn name(&self) -> &str;

    /// The portfolio this rule assigns, or `None` to fall through.
    fn apply(&self, signals: &Signals<'_>) -> Option<String>;
}

/// Outcome of a cascade. `rule` is `None` when the fallback applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub portfolio: String,
    pub rule: Option<String>,
}

/// Ordered rules plus the label used when none match.
#[derive(Debug)]
pub struct Cascade {
    rules: Vec<Box<dyn Rule>>,
    fallback: String,
}

impl Cascade {
    pub fn new(rules: Vec<Box<dyn Rule>>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    pub fn evaluate(&self, signals: &Signals<'_>) -> Decision {
        for rule in &self.rules {
            if let Some(portfolio) = rule.apply(signals) {
                return Decision {
                    portfolio,
                    rule: Some(rule.name().to_string()),
                };
            }
        }
        Decision {
            portfolio: self.fallback.clone(),
            rule: None,
        }
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}
