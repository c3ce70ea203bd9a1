//! JSON API over the dashboard services.

pub mod handlers;

use std::future::Future;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/reference", get(handlers::reference))
        .route("/api/classification/triage", get(handlers::triage))
        .route("/api/classification/backlog", get(handlers::backlog))
        .route("/api/classification/trend", get(handlers::trend))
        .route("/api/classification/bugs", get(handlers::bugs))
        .route("/api/summary/trend", get(handlers::trend_summary))
        .route("/api/summary/portfolios", get(handlers::portfolio_summary))
        .route("/api/summary/backlog", get(handlers::backlog_summary))
        .with_state(state)
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on SIGINT or SIGTERM (Ctrl-C elsewhere).
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut term), Ok(mut int)) => {
                tokio::select! {
                    _ = term.recv() => {}
                    _ = int.recv() => {}
                }
            }
            _ => {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::warn!("Could not listen for shutdown signal: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Could not listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
    log::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use serde_json::Value;
    use tokio::sync::oneshot;

    use super::*;
    use crate::jira::mock::MockTracker;
    use crate::services::dashboard::test_support::{bug, state};

    async fn spawn(tracker: MockTracker) -> (SocketAddr, oneshot::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let state = state(Arc::new(tracker));
        tokio::spawn(async move {
            serve(listener, state, async move {
                let _ = rx.await;
            })
            .await
            .unwrap();
        });
        (addr, tx)
    }

    async fn get(addr: SocketAddr, path: &str) -> (u16, Value) {
        let response = reqwest::get(format!("http://{}{}", addr, path)).await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_endpoints_over_http() {
        let tracker = MockTracker::new()
            .with_results(
                "created >= 2025-04-08 AND created <= 2025-05-21 AND status was not in",
                vec![bug("IO-1", "IO", Some("Komal_Reportees"), "Open")],
            )
            .with_results("status not in", vec![bug("IO-2", "IO", Some("Komal_Reportees"), "Open")]);
        let (addr, shutdown) = spawn(tracker).await;

        let (status, health) = get(addr, "/healthz").await;
        assert_eq!(status, 200);
        assert_eq!(health["defaultRelease"], "april");

        let (_, reference) = get(addr, "/api/reference").await;
        assert_eq!(reference["triage"]["rules"][0], "devops");
        assert_eq!(reference["backlog"]["fallback"], "Non Engineering");
        assert_eq!(reference["releases"][1]["name"], "may");
        assert!(reference["teams"].as_array().unwrap().iter().any(|t| t == "Flow Builder"));
        let ui = reference["teamsByPortfolio"]["UI"].as_array().unwrap();
        assert!(ui.iter().any(|t| t == "UI Framework"));
        assert!(ui.iter().all(|t| t != "Flow Builder"));
        assert!(reference["managerGroups"]
            .as_array()
            .unwrap()
            .iter()
            .any(|g| g == "Komal_Reportees"));

        let (status, triage) = get(addr, "/api/classification/triage?release=may").await;
        assert_eq!(status, 200);
        assert_eq!(triage[0]["key"], "IO-1");
        assert_eq!(triage[0]["portfolio"], "UI");
        assert_eq!(triage[0]["managerGroup"], "Komal_Reportees");

        let (_, backlog) = get(addr, "/api/classification/backlog").await;
        assert_eq!(backlog[0]["portfolio"], "Fayaz");

        let (_, trend) = get(addr, "/api/classification/trend").await;
        assert_eq!(trend.as_object().unwrap().len(), 12);

        let (_, summary) = get(addr, "/api/summary/trend").await;
        assert_eq!(summary["before"]["columns"][0], "April");

        let (_, backlog_summary) = get(addr, "/api/summary/backlog?release=all").await;
        assert_eq!(backlog_summary["release"], "all");
        assert_eq!(backlog_summary["totals"]["totalIssues"], 1);

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn test_tracker_failure_degrades() {
        let (addr, shutdown) = spawn(MockTracker::new().failing()).await;

        let (status, triage) = get(addr, "/api/classification/triage").await;
        assert_eq!(status, 200);
        assert_eq!(triage, Value::Array(Vec::new()));

        let (status, bugs) = get(addr, "/api/classification/bugs?release=july").await;
        assert_eq!(status, 200);
        assert!(bugs.as_array().unwrap().is_empty());

        let (status, trend) = get(addr, "/api/classification/trend").await;
        assert_eq!(status, 200);
        assert!(trend["aprilResolved"].as_array().unwrap().is_empty());

        let (status, body) = get(addr, "/api/summary/portfolios").await;
        assert_eq!(status, 502);
        assert_eq!(body["canRetry"], true);
        assert_eq!(body["errorType"], "retryable");

        let _ = shutdown.send(());
    }
}
