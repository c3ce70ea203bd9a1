//! Error types for the dashboard service
//!
//! Errors are classified by recoverability:
//! - Retryable: Jira network failures, timeouts, rate limits, 5xx
//! - NonRetryable: bad reference tables, malformed Jira responses
//! - RequiresUserAction: missing credentials, unusable configuration

use thiserror::Error;

use crate::jira::JiraError;
use crate::reference::ReferenceError;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Jira(#[from] JiraError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn is_retryable(&self) -> bool {
        match self {
            DashboardError::Jira(e) => e.is_retryable(),
            DashboardError::Io(_) => true,
            DashboardError::Reference(_) | DashboardError::Config(_) => false,
        }
    }

    pub fn requires_user_action(&self) -> bool {
        matches!(
            self,
            DashboardError::Config(_)
                | DashboardError::Jira(JiraError::MissingCredentials(_))
                | DashboardError::Jira(JiraError::InvalidUrl(_))
        ) || matches!(self, DashboardError::Jira(JiraError::Api { status, .. }) if *status == 401 || *status == 403)
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashboardError::Jira(JiraError::MissingCredentials(_)) => {
                "Set JIRA_BASE_URL, JIRA_USERNAME and JIRA_API_TOKEN, or fill in ~/.bugboard/config.json"
            }
            DashboardError::Jira(JiraError::InvalidUrl(_)) => {
                "Check the Jira base URL in ~/.bugboard/config.json"
            }
            DashboardError::Jira(JiraError::Api { status: 401 | 403, .. }) => {
                "Check the Jira username and API token."
            }
            DashboardError::Jira(JiraError::Api { status: 400, .. }) => {
                "Jira rejected the query. Check project keys and status names in the reference tables."
            }
            DashboardError::Jira(JiraError::Json(_)) => "Jira returned an unexpected payload.",
            DashboardError::Jira(_) => "Check connectivity to Jira and try again.",
            DashboardError::Reference(_) => "Fix the reference table override in referenceDir.",
            DashboardError::Config(_) => "Check your configuration in ~/.bugboard/config.json",
            DashboardError::Io(_) => "Check the bind address and file permissions.",
        }
    }
}

/// Serializable error body for API responses
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub message: String,
    pub error_type: ErrorType,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Retryable,
    NonRetryable,
    RequiresUserAction,
}

impl From<&DashboardError> for ApiErrorBody {
    fn from(err: &DashboardError) -> Self {
        let error_type = if err.requires_user_action() {
            ErrorType::RequiresUserAction
        } else if err.is_retryable() {
            ErrorType::Retryable
        } else {
            ErrorType::NonRetryable
        };

        ApiErrorBody {
            message: err.to_string(),
            error_type,
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}
