// Dashboard service: every endpoint's fetch → normalize → classify → aggregate path.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::metrics::{bug_metrics, BugMetrics};
use crate::aggregate::summary::{summarize_backlog, summarize_portfolios, BacklogSummary, PortfolioSummaryTable};
use crate::aggregate::trend::{self, TrendSummary};
use crate::classify::Strategy;
use crate::jira::search::{
    search, search_batch, BACKLOG_ALL_MAX_PAGES, BACKLOG_RELEASE_MAX_PAGES, TRIAGE_MAX_PAGES,
    TREND_MAX_PAGES,
};
use crate::reference::schema::Release;
use crate::releases::BacklogSelection;
use crate::state::AppState;
use crate::types::{ClassifiedIssue, Issue};
use crate::DashboardError;

/// Triage summary plus headline metrics for one release.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioReport {
    pub release: String,
    pub summary: PortfolioSummaryTable,
    pub metrics: BugMetrics,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogReport {
    /// Release name, or `all` for the whole open backlog.
    pub release: String,
    #[serde(flatten)]
    pub summary: BacklogSummary,
}

fn resolve_release<'a>(state: &'a AppState, name: Option<&str>) -> Result<&'a Release, DashboardError> {
    state.tables.releases.resolve(name).ok_or_else(|| {
        DashboardError::Config(format!(
            "default release '{}' is not in the calendar",
            state.tables.releases.default_release
        ))
    })
}

async fn fetch_classified(
    state: &AppState,
    strategy: Strategy,
    jql: &str,
    max_pages: u32,
) -> Result<Vec<ClassifiedIssue>, DashboardError> {
    let raw = search(state.tracker.as_ref(), jql, state.page_size(), max_pages).await?;
    let issues = raw.into_iter().map(Issue::from).collect();
    Ok(state.classifier.classify_issues(strategy, issues))
}

/// Bugs created in the release window and still open at its end.
pub async fn triage_issues(
    state: &AppState,
    release: Option<&str>,
) -> Result<Vec<ClassifiedIssue>, DashboardError> {
    let release = resolve_release(state, release)?;
    let jql = state.tables.releases.triage_jql(release);
    log::info!("Triage query for '{}'", release.name);
    fetch_classified(state, Strategy::Triage, &jql, TRIAGE_MAX_PAGES).await
}

/// Every bug created in the release window, whatever its current status.
pub async fn release_bugs(
    state: &AppState,
    release: Option<&str>,
) -> Result<Vec<ClassifiedIssue>, DashboardError> {
    let release = resolve_release(state, release)?;
    let jql = state.tables.releases.release_bugs_jql(release);
    log::info!("Release bug query for '{}'", release.name);
    fetch_classified(state, Strategy::Triage, &jql, TRIAGE_MAX_PAGES).await
}

/// Open backlog, either now (`all`) or as of a release cutoff.
pub async fn backlog_issues(
    state: &AppState,
    release: Option<&str>,
) -> Result<(String, Vec<ClassifiedIssue>), DashboardError> {
    let selection = state.tables.releases.backlog_selection(release);
    let (name, max_pages) = match selection {
        BacklogSelection::All => ("all".to_string(), BACKLOG_ALL_MAX_PAGES),
        BacklogSelection::Release(r) => (r.name.clone(), BACKLOG_RELEASE_MAX_PAGES),
    };
    let jql = state.tables.releases.backlog_jql(selection);
    log::info!("Backlog query for '{}'", name);
    let issues = fetch_classified(state, Strategy::Backlog, &jql, max_pages).await?;
    Ok((name, issues))
}

/// Every trend window keyed by window name. A failed window is empty or
/// partial; the batch itself never fails.
pub async fn trend_issues(state: &AppState) -> HashMap<String, Vec<ClassifiedIssue>> {
    let queries: Vec<(String, String)> = state
        .tables
        .releases
        .trend_windows()
        .into_iter()
        .map(|w| (w.name, w.jql))
        .collect();

    let fetched = search_batch(
        Arc::clone(&state.tracker),
        queries,
        state.page_size(),
        TREND_MAX_PAGES,
    )
    .await;

    fetched
        .into_iter()
        .map(|(name, raw)| {
            let issues = raw.into_iter().map(Issue::from).collect();
            (name, state.classifier.classify_issues(Strategy::Triage, issues))
        })
        .collect()
}

pub async fn trend_report(state: &AppState) -> TrendSummary {
    let windows = state.tables.releases.trend_windows();
    let fetched = trend_issues(state).await;
    trend::trend_summary(&windows, &fetched, &state.tables.portfolios.triage_order)
}

pub async fn portfolio_report(
    state: &AppState,
    release: Option<&str>,
) -> Result<PortfolioReport, DashboardError> {
    let name = resolve_release(state, release)?.name.clone();
    let issues = triage_issues(state, Some(&name)).await?;
    let scope = &state.tables.releases.scopes.triage;
    Ok(PortfolioReport {
        release: name,
        summary: summarize_portfolios(
            &issues,
            &state.tables.portfolios.triage_order,
            &scope.terminal_statuses,
        ),
        metrics: bug_metrics(&issues),
    })
}

pub async fn backlog_report(
    state: &AppState,
    release: Option<&str>,
    now: DateTime<Utc>,
) -> Result<BacklogReport, DashboardError> {
    let (name, issues) = backlog_issues(state, release).await?;
    Ok(BacklogReport {
        release: name,
        summary: summarize_backlog(&issues, &state.tables.portfolios, now),
    })
}
