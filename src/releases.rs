//! Release calendar lookups and the JQL for every dashboard window.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::jql::{Clause, Query};
use crate::reference::schema::{QueryScope, Release, ReleaseCalendar};

const BUG: &str = "Bug";

/// Which trend table a window feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendKind {
    /// Open at the start of the release period.
    Before,
    /// Created during the period and still open just after it.
    Addition,
    /// Open at period start and moved to a terminal status during it.
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendWindow {
    /// Window key, e.g. `beforeApril`, `april`, `aprilResolved`.
    pub name: String,
    pub release: String,
    /// Column header in the trend tables.
    pub label: String,
    pub kind: TrendKind,
    pub jql: String,
}

/// Backlog query target: everything open now, or open as of a release cutoff.
#[derive(Debug, Clone, Copy)]
pub enum BacklogSelection<'a> {
    All,
    Release(&'a Release),
}

fn day_before(d: NaiveDate) -> NaiveDate {
    d.checked_sub_days(Days::new(1)).unwrap_or(d)
}

fn day_after(d: NaiveDate) -> NaiveDate {
    d.checked_add_days(Days::new(1)).unwrap_or(d)
}

fn bugs_in(scope: &QueryScope) -> Query {
    Query::new()
        .and(Clause::Projects(scope.projects.clone()))
        .and(Clause::IssueType(BUG.to_string()))
}

impl ReleaseCalendar {
    /// Case-insensitive lookup by release name.
    pub fn find(&self, name: &str) -> Option<&Release> {
        let name = name.trim();
        self.releases
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// The named release, or the default release when the name is absent or unknown.
    pub fn resolve(&self, name: Option<&str>) -> Option<&Release> {
        if let Some(release) = name.and_then(|n| self.find(n)) {
            return Some(release);
        }
        if let Some(n) = name {
            log::warn!("Unknown release '{}', using '{}'", n, self.default_release);
        }
        self.find(&self.default_release)
    }

    /// `all` or no name selects the whole open backlog.
    pub fn backlog_selection(&self, name: Option<&str>) -> BacklogSelection<'_> {
        match name.map(str::trim) {
            None | Some("") => BacklogSelection::All,
            Some(n) if n.eq_ignore_ascii_case("all") => BacklogSelection::All,
            Some(n) => match self.resolve(Some(n)) {
                Some(release) => BacklogSelection::Release(release),
                None => BacklogSelection::All,
            },
        }
    }

    /// Bugs created in the release window and still open at its end.
    pub fn triage_jql(&self, release: &Release) -> String {
        let scope = &self.scopes.triage;
        bugs_in(scope)
            .and(Clause::CreatedOnOrAfter(release.created_from))
            .and(Clause::CreatedOnOrBefore(release.created_to))
            .and(Clause::OpenOn {
                statuses: scope.terminal_statuses.clone(),
                on: release.created_to,
            })
            .order_by(&scope.order_by)
            .to_string()
    }

    /// Every bug created in the release window, whatever its status.
    pub fn release_bugs_jql(&self, release: &Release) -> String {
        bugs_in(&self.scopes.backlog)
            .and(Clause::CreatedOnOrAfter(release.created_from))
            .and(Clause::CreatedOnOrBefore(release.created_to))
            .order_by(&self.scopes.triage.order_by)
            .to_string()
    }

    pub fn backlog_jql(&self, selection: BacklogSelection<'_>) -> String {
        let scope = &self.scopes.backlog;
        let statuses = scope.terminal_statuses.clone();
        let query = match selection {
            BacklogSelection::All => bugs_in(scope).and(Clause::OpenNow { statuses }),
            BacklogSelection::Release(release) => bugs_in(scope)
                .and(Clause::CreatedOnOrBefore(release.backlog_cutoff))
                .and(Clause::OpenBefore {
                    statuses,
                    before: day_after(release.backlog_cutoff),
                }),
        };
        query.order_by(&scope.order_by).to_string()
    }

    /// Before, addition and resolved windows for every release, in calendar order.
    pub fn trend_windows(&self) -> Vec<TrendWindow> {
        let scope = &self.scopes.triage;
        let terminal = &scope.terminal_statuses;
        let mut windows = Vec::with_capacity(self.releases.len() * 3);

        for release in &self.releases {
            let start = release.period_start;
            let end = release.period_end;

            let before = bugs_in(scope)
                .and(Clause::CreatedOnOrBefore(day_before(start)))
                .and(Clause::OpenOn {
                    statuses: terminal.clone(),
                    on: start,
                });
            let addition = bugs_in(scope)
                .and(Clause::CreatedOnOrAfter(start))
                .and(Clause::CreatedOnOrBefore(end))
                .and(Clause::OpenOn {
                    statuses: terminal.clone(),
                    on: day_after(end),
                });
            let resolved = before.clone().and(Clause::ChangedToDuring {
                statuses: terminal.clone(),
                from: start,
                to: end,
            });

            for (name, kind, query) in [
                (format!("before{}", release.label), TrendKind::Before, before),
                (release.name.clone(), TrendKind::Addition, addition),
                (format!("{}Resolved", release.name), TrendKind::Resolved, resolved),
            ] {
                windows.push(TrendWindow {
                    name,
                    release: release.name.clone(),
                    label: release.label.clone(),
                    kind,
                    jql: query.order_by(&scope.order_by).to_string(),
                });
            }
        }
        windows
    }
}
