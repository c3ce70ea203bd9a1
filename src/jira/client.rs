//! HTTP client for the Jira Cloud search endpoint.
//!
//! Basic auth with a service account email and API token. All searches go
//! through `GET {base}/rest/api/3/search`.

use async_trait::async_trait;
use url::Url;

use super::{send_with_retry, JiraConfig, JiraError, RetryPolicy, SEARCH_FIELDS};
use crate::types::{RawIssue, RawSearchPage};

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub issues: Vec<RawIssue>,
    /// Total matches as reported by the tracker, when it reports one.
    pub total: Option<u32>,
}

/// The outbound search seam. The dashboard only ever needs a page at a time.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn search_page(
        &self,
        jql: &str,
        start_at: u32,
        max_results: u32,
    ) -> Result<SearchPage, JiraError>;
}

pub struct JiraClient {
    client: reqwest::Client,
    search_url: Url,
    username: String,
    api_token: String,
    retry: RetryPolicy,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> Result<Self, JiraError> {
        let username = config
            .username
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or(JiraError::MissingCredentials("username"))?;
        let api_token = config
            .api_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or(JiraError::MissingCredentials("apiToken"))?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            search_url: search_url(&config.base_url)?,
            username,
            api_token,
            retry: config.retry_policy(),
        })
    }
}

fn search_url(base_url: &str) -> Result<Url, JiraError> {
    let invalid = |reason: String| JiraError::InvalidUrl(format!("{}: {}", base_url, reason));
    let mut base = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
        return Err(invalid("expected an http(s) URL".to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("rest/api/3/search")
        .map_err(|e| invalid(e.to_string()))
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn search_page(
        &self,
        jql: &str,
        start_at: u32,
        max_results: u32,
    ) -> Result<SearchPage, JiraError> {
        let request = self
            .client
            .get(self.search_url.clone())
            .basic_auth(&self.username, Some(&self.api_token))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("jql", jql.to_string()),
                ("fields", SEARCH_FIELDS.to_string()),
                ("maxResults", max_results.to_string()),
                ("startAt", start_at.to_string()),
            ]);

        let resp = send_with_retry(request, &self.retry).await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(JiraError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let page: RawSearchPage = serde_json::from_str(&body)?;
        Ok(SearchPage {
            issues: page.issues,
            total: page.total,
        })
    }
}
