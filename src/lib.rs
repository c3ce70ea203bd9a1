//! Jira bug analytics by engineering portfolio.
//!
//! Bugs are fetched page by page from Jira search, normalized, classified
//! into portfolios by the triage or backlog cascade, and rolled up into
//! per-portfolio and per-window tables served as JSON.

pub mod aggregate;
pub mod classify;
mod error;
pub mod http;
pub mod jira;
pub mod jql;
pub mod reference;
pub mod releases;
pub mod services;
pub mod state;
pub mod types;

pub use error::{ApiErrorBody, DashboardError, ErrorType};

use tokio::net::TcpListener;

use state::{load_config, AppState};

/// Load configuration and reference tables, then serve the dashboard API
/// until SIGINT or SIGTERM.
pub async fn run() -> Result<(), DashboardError> {
    let config = load_config().map_err(DashboardError::Config)?;
    let bind_addr = config.bind_addr.clone();
    let state = AppState::from_config(config)?;

    log::info!(
        "Loaded {} teams, {} releases (default '{}')",
        state.tables.teams.len(),
        state.tables.releases.releases.len(),
        state.tables.releases.default_release
    );

    let listener = TcpListener::bind(bind_addr.as_str()).await?;
    log::info!("Dashboard listening on http://{}", listener.local_addr()?);

    http::serve(listener, state, http::shutdown_signal()).await?;
    log::info!("Dashboard stopped");
    Ok(())
}
