//! Paginated query execution.
//!
//! `search` is strict: any failed page fails the query. `search_batch` is
//! lenient per query: a failed page ends that query with what it already
//! has, and the other queries carry on.

use std::sync::Arc;

use tokio::task::JoinSet;

use super::client::IssueTracker;
use super::JiraError;
use crate::types::RawIssue;

/// Page ceilings per query family.
pub const TRIAGE_MAX_PAGES: u32 = 10;
pub const BACKLOG_ALL_MAX_PAGES: u32 = 30;
pub const BACKLOG_RELEASE_MAX_PAGES: u32 = 15;
pub const TREND_MAX_PAGES: u32 = 10;

enum PageOutcome {
    More,
    Done,
}

async fn fetch_page(
    tracker: &dyn IssueTracker,
    jql: &str,
    start_at: u32,
    page_size: u32,
    into: &mut Vec<RawIssue>,
) -> Result<PageOutcome, JiraError> {
    let page = tracker.search_page(jql, start_at, page_size).await?;
    let count = page.issues.len();
    into.extend(page.issues);
    log::debug!("page startAt={} returned {} issues", start_at, count);

    let short = count < page_size as usize;
    let exhausted = page
        .total
        .is_some_and(|total| start_at as usize + count >= total as usize);
    if short || exhausted {
        Ok(PageOutcome::Done)
    } else {
        Ok(PageOutcome::More)
    }
}

/// Fetch every page of `jql`, up to `max_pages`. The first failed page
/// fails the whole query.
pub async fn search(
    tracker: &dyn IssueTracker,
    jql: &str,
    page_size: u32,
    max_pages: u32,
) -> Result<Vec<RawIssue>, JiraError> {
    let page_size = page_size.max(1);
    let mut issues = Vec::new();
    let mut start_at = 0;
    for page in 0..max_pages {
        log::debug!("Fetching page {}/{} (startAt {})", page + 1, max_pages, start_at);
        if let PageOutcome::Done = fetch_page(tracker, jql, start_at, page_size, &mut issues).await? {
            break;
        }
        start_at += page_size;
    }
    log::info!("Query returned {} issues", issues.len());
    Ok(issues)
}

async fn search_lenient(
    tracker: &dyn IssueTracker,
    name: &str,
    jql: &str,
    page_size: u32,
    max_pages: u32,
) -> Vec<RawIssue> {
    let page_size = page_size.max(1);
    let mut issues = Vec::new();
    let mut start_at = 0;
    for page in 0..max_pages {
        match fetch_page(tracker, jql, start_at, page_size, &mut issues).await {
            Ok(PageOutcome::More) => start_at += page_size,
            Ok(PageOutcome::Done) => break,
            Err(e) => {
                log::warn!(
                    "Window '{}' page {} failed, keeping {} issues: {}",
                    name,
                    page + 1,
                    issues.len(),
                    e
                );
                break;
            }
        }
    }
    log::info!("Window '{}' returned {} issues", name, issues.len());
    issues
}

/// Run named queries concurrently. Results come back in input order; a
/// failing query contributes whatever it fetched before the failure.
pub async fn search_batch(
    tracker: Arc<dyn IssueTracker>,
    queries: Vec<(String, String)>,
    page_size: u32,
    max_pages: u32,
) -> Vec<(String, Vec<RawIssue>)> {
    let mut set = JoinSet::new();
    for (index, (name, jql)) in queries.iter().cloned().enumerate() {
        let tracker = Arc::clone(&tracker);
        set.spawn(async move {
            let issues = search_lenient(tracker.as_ref(), &name, &jql, page_size, max_pages).await;
            (index, issues)
        });
    }

    let mut slots: Vec<Vec<RawIssue>> = vec![Vec::new(); queries.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, issues)) => slots[index] = issues,
            Err(e) => log::error!("Batch query task failed: {}", e),
        }
    }

    queries
        .into_iter()
        .map(|(name, _)| name)
        .zip(slots)
        .collect()
}
