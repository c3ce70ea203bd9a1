use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::aggregate::trend::TrendSummary;
use crate::classify::Strategy;
use crate::error::ApiErrorBody;
use crate::jira::JiraError;
use crate::services::dashboard::{self, BacklogReport, PortfolioReport};
use crate::state::AppState;
use crate::types::ClassifiedIssue;
use crate::DashboardError;

#[derive(Debug, Default, Deserialize)]
pub struct ReleaseParams {
    pub release: Option<String>,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::Jira(JiraError::MissingCredentials(_))
            | DashboardError::Jira(JiraError::InvalidUrl(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Jira(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ApiErrorBody::from(&self))).into_response()
    }
}

/// Classification lists never fail past this point: log and serve empty.
fn or_empty(what: &str, result: Result<Vec<ClassifiedIssue>, DashboardError>) -> Json<Vec<ClassifiedIssue>> {
    match result {
        Ok(issues) => Json(issues),
        Err(e) => {
            log::error!("{} classification failed: {}", what, e);
            Json(Vec::new())
        }
    }
}

pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let releases: Vec<&str> = state
        .tables
        .releases
        .releases
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    Json(json!({
        "status": "ok",
        "defaultRelease": state.tables.releases.default_release,
        "releases": releases,
    }))
}

/// Strategies, display orders, teams per portfolio and the release calendar.
pub async fn reference(State(state): State<AppState>) -> Json<Value> {
    let classifier = &state.classifier;
    let teams = classifier.teams();
    let teams_by_portfolio: HashMap<String, Vec<String>> = teams
        .all_portfolios()
        .into_iter()
        .map(|p| {
            let members = teams.teams_for_portfolio(&p);
            (p, members)
        })
        .collect();
    let strategy = |s: Strategy, order: &[String]| {
        json!({
            "rules": classifier.rule_names(s),
            "fallback": classifier.fallback(s),
            "order": order,
        })
    };
    Json(json!({
        "triage": strategy(Strategy::Triage, &state.tables.portfolios.triage_order),
        "backlog": strategy(Strategy::Backlog, &state.tables.portfolios.backlog_order),
        "engineering": state.tables.portfolios.engineering,
        "teams": teams.all_teams(),
        "teamsByPortfolio": teams_by_portfolio,
        "managerGroups": classifier.managers().all_manager_groups(),
        "releases": state.tables.releases.releases,
    }))
}

pub async fn triage(
    State(state): State<AppState>,
    Query(params): Query<ReleaseParams>,
) -> Json<Vec<ClassifiedIssue>> {
    or_empty(
        "Triage",
        dashboard::triage_issues(&state, params.release.as_deref()).await,
    )
}

pub async fn bugs(
    State(state): State<AppState>,
    Query(params): Query<ReleaseParams>,
) -> Json<Vec<ClassifiedIssue>> {
    or_empty(
        "Release bug",
        dashboard::release_bugs(&state, params.release.as_deref()).await,
    )
}

pub async fn backlog(
    State(state): State<AppState>,
    Query(params): Query<ReleaseParams>,
) -> Json<Vec<ClassifiedIssue>> {
    let result = dashboard::backlog_issues(&state, params.release.as_deref())
        .await
        .map(|(_, issues)| issues);
    or_empty("Backlog", result)
}

pub async fn trend(State(state): State<AppState>) -> Json<HashMap<String, Vec<ClassifiedIssue>>> {
    Json(dashboard::trend_issues(&state).await)
}

pub async fn trend_summary(State(state): State<AppState>) -> Json<TrendSummary> {
    Json(dashboard::trend_report(&state).await)
}

pub async fn portfolio_summary(
    State(state): State<AppState>,
    Query(params): Query<ReleaseParams>,
) -> Result<Json<PortfolioReport>, DashboardError> {
    let report = dashboard::portfolio_report(&state, params.release.as_deref()).await?;
    Ok(Json(report))
}

pub async fn backlog_summary(
    State(state): State<AppState>,
    Query(params): Query<ReleaseParams>,
) -> Result<Json<BacklogReport>, DashboardError> {
    let report = dashboard::backlog_report(&state, params.release.as_deref(), Utc::now()).await?;
    Ok(Json(report))
}
