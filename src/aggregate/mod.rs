//! Roll classified issues up into the dashboard's tables.
//!
//! Window membership comes from the query that fetched each list; nothing
//! here looks at current status to decide which window an issue is in.

pub mod metrics;
pub mod summary;
pub mod trend;

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

/// Sort key for a portfolio: listed ones by position, the rest alphabetically after.
fn compare_portfolios(a: &str, b: &str, order: &[String]) -> Ordering {
    let rank = |p: &str| order.iter().position(|o| o == p);
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

pub fn sort_by_display_order(portfolios: &mut [String], order: &[String]) {
    portfolios.sort_by(|a, b| compare_portfolios(a, b, order));
}

pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Parse Jira's `2025-03-01T10:00:00.000+0000`, RFC 3339, or a bare date.
pub fn parse_jira_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
