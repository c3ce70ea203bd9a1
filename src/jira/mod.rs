//! Jira Cloud REST integration.
//!
//! `client` talks to `/rest/api/3/search` with basic auth, `search` drives
//! pagination on top of the [`client::IssueTracker`] seam. Transient HTTP
//! failures are retried here before the executor's own failure policy runs.

pub mod client;
pub mod search;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fields requested on every search.
pub const SEARCH_FIELDS: &str = "id,key,summary,status,priority,assignee,reporter,created,updated,\
resolutiondate,labels,components,fixVersions,customfield_12000,customfield_15072,project";

/// Jira connection settings, the `jira` block of the dashboard config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_page_size() -> u32 {
    100
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    250
}

fn default_max_backoff_ms() -> u64 {
    2_000
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: None,
            api_token: None,
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl JiraConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff_ms: self.initial_backoff_ms,
            max_backoff_ms: self.max_backoff_ms,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JiraError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Jira API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Jira {0} is not configured")]
    MissingCredentials(&'static str),
    #[error("Invalid Jira base URL: {0}")]
    InvalidUrl(String),
}

impl JiraError {
    /// Whether a later identical request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            JiraError::Http(e) => e.is_timeout() || e.is_connect(),
            JiraError::Api { status, .. } => {
                *status == 429 || *status == 408 || (500..600).contains(status)
            }
            JiraError::Json(_) | JiraError::MissingCredentials(_) | JiraError::InvalidUrl(_) => {
                false
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

fn retry_delay(
    attempt: u32,
    policy: &RetryPolicy,
    retry_after: Option<&reqwest::header::HeaderValue>,
) -> Duration {
    if let Some(secs) = retry_after
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
    {
        return Duration::from_secs(secs.min(30));
    }

    let exponent = 2u64.saturating_pow(attempt.saturating_sub(1));
    let base = policy
        .initial_backoff_ms
        .saturating_mul(exponent)
        .min(policy.max_backoff_ms);
    let jitter = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0)
        % 150;
    Duration::from_millis(base.saturating_add(jitter))
}

/// Verdict on one attempt.
enum Attempt {
    Done(Result<reqwest::Response, JiraError>),
    /// Worth repeating; `last` is handed back if no attempts remain.
    Retry {
        last: Result<reqwest::Response, JiraError>,
        delay: Duration,
        reason: String,
    },
}

fn judge(
    result: Result<reqwest::Response, reqwest::Error>,
    attempt: u32,
    policy: &RetryPolicy,
) -> Attempt {
    match result {
        Ok(response) if is_retryable_status(response.status()) => {
            let status = response.status();
            // Jira Cloud sends Retry-After on 429 and on 503 during throttling.
            let delay = retry_delay(
                attempt,
                policy,
                response.headers().get(reqwest::header::RETRY_AFTER),
            );
            let reason = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                "rate limited".to_string()
            } else {
                format!("status {}", status.as_u16())
            };
            Attempt::Retry {
                last: Ok(response),
                delay,
                reason,
            }
        }
        Ok(response) => Attempt::Done(Ok(response)),
        Err(err) if err.is_timeout() || err.is_connect() => Attempt::Retry {
            delay: retry_delay(attempt, policy, None),
            reason: format!("transport error: {}", err),
            last: Err(JiraError::Http(err)),
        },
        Err(err) => Attempt::Done(Err(JiraError::Http(err))),
    }
}

/// Send `request`, retrying 429/408/5xx responses and connect/timeout errors.
///
/// The last response is returned as-is once attempts run out, so callers
/// still see the final status.
pub async fn send_with_retry(
    request: reqwest::RequestBuilder,
    policy: &RetryPolicy,
) -> Result<reqwest::Response, JiraError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let Some(cloned) = request.try_clone() else {
            return request.send().await.map_err(JiraError::Http);
        };

        match judge(cloned.send().await, attempt, policy) {
            Attempt::Done(result) => return result,
            Attempt::Retry { last, reason, .. } if attempt >= attempts => {
                log::warn!("Jira {} after {} attempts, giving up", reason, attempts);
                return last;
            }
            Attempt::Retry { delay, reason, .. } => {
                log::warn!(
                    "Jira {} (attempt {}/{}), retrying in {:?}",
                    reason,
                    attempt,
                    attempts,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
