//! Small JQL builder for the handful of clause shapes the dashboard uses.

use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `project in (...)`
    Projects(Vec<String>),
    /// `issuetype = <name>`
    IssueType(String),
    /// `created >= <date>`
    CreatedOnOrAfter(NaiveDate),
    /// `created <= <date>`
    CreatedOnOrBefore(NaiveDate),
    /// `status was not in (...) on <date>`: open as of that day.
    OpenOn { statuses: Vec<String>, on: NaiveDate },
    /// `status was not in (...) before <date>`
    OpenBefore { statuses: Vec<String>, before: NaiveDate },
    /// `status not in (...)`: open right now.
    OpenNow { statuses: Vec<String> },
    /// `status changed to (...) during (<from>, <to>)`
    ChangedToDuring {
        statuses: Vec<String>,
        from: NaiveDate,
        to: NaiveDate,
    },
}

/// Quote a JQL value unless it is a bare word.
pub fn quote(value: &str) -> String {
    let bare = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

fn list(values: &[String]) -> String {
    values.iter().map(|v| quote(v)).collect::<Vec<_>>().join(", ")
}

fn date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Projects(p) => write!(f, "project in ({})", list(p)),
            Clause::IssueType(t) => write!(f, "issuetype = {}", quote(t)),
            Clause::CreatedOnOrAfter(d) => write!(f, "created >= {}", date(d)),
            Clause::CreatedOnOrBefore(d) => write!(f, "created <= {}", date(d)),
            Clause::OpenOn { statuses, on } => {
                write!(f, "status was not in ({}) on {}", list(statuses), date(on))
            }
            Clause::OpenBefore { statuses, before } => {
                write!(f, "status was not in ({}) before {}", list(statuses), date(before))
            }
            Clause::OpenNow { statuses } => write!(f, "status not in ({})", list(statuses)),
            Clause::ChangedToDuring { statuses, from, to } => write!(
                f,
                "status changed to ({}) during ({}, {})",
                list(statuses),
                date(from),
                date(to)
            ),
        }
    }
}

/// AND-joined clauses with an optional ORDER BY.
#[derive(Debug, Clone, Default)]
pub struct Query {
    clauses: Vec<Clause>,
    order_by: Option<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn order_by(mut self, order: &str) -> Self {
        if !order.trim().is_empty() {
            self.order_by = Some(order.trim().to_string());
        }
        self
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{}", clause)?;
        }
        if let Some(order) = &self.order_by {
            write!(f, " ORDER BY {}", order)?;
        }
        Ok(())
    }
}
