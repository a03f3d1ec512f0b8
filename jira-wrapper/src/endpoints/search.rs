//! JQL search with offset pagination.

use serde_json::Value;
use tracing::debug;

use crate::client::JiraClient;
use crate::consts::{DEFAULT_MAX_RESULTS, SEARCH_PAGE_SIZE, SEARCH_PATH};
use crate::error::{JiraError, Result};
use crate::models::Issue;
use crate::pagination::page_windows;

/// Options for [`JiraClient::search_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
  /// Upper bound on the number of issues returned
  pub max_results: u64,
  /// Fetch each issue's worklog (one extra request per issue)
  pub include_worklog: bool,
}

impl Default for SearchOptions {
  fn default() -> Self {
    Self {
      max_results: DEFAULT_MAX_RESULTS,
      include_worklog: false,
    }
  }
}

impl SearchOptions {
  pub fn max_results(mut self, max_results: u64) -> Self {
    self.max_results = max_results;
    self
  }

  pub fn include_worklog(mut self, include_worklog: bool) -> Self {
    self.include_worklog = include_worklog;
    self
  }
}

impl JiraClient {
  /// Run a JQL query and parse up to `max_results` matching issues.
  ///
  /// Up to [`SEARCH_PAGE_SIZE`] results are fetched with a single request.
  /// Larger searches first ask Jira for the total, then read pages in
  /// ascending offset order until `min(max_results, total)` issues are in.
  pub async fn search(&self, jql: &str, max_results: u64, include_worklog: bool) -> Result<Vec<Issue>> {
    let catalog = self.load_fields().await?;

    let windows = if max_results <= SEARCH_PAGE_SIZE {
      vec![(0, max_results)]
    } else {
      let total = self.search_total(jql).await?;
      page_windows(max_results.min(total), SEARCH_PAGE_SIZE)
    };

    let mut issues = Vec::new();
    for (start_at, page_size) in windows {
      let page = self.search_page(jql, start_at, page_size).await?;
      issues.extend(self.parse_page(&page, &catalog, include_worklog).await?);
    }

    debug!(jql, found = issues.len(), "search complete");
    Ok(issues)
  }

  pub async fn search_with(&self, jql: &str, options: &SearchOptions) -> Result<Vec<Issue>> {
    self.search(jql, options.max_results, options.include_worklog).await
  }

  /// Fetch a single issue by key, or `None` when the search comes back empty.
  pub async fn get_issue(&self, issue_key: &str, include_worklog: bool) -> Result<Option<Issue>> {
    let issues = self.search(&format!("key={issue_key}"), 1, include_worklog).await?;
    Ok(issues.into_iter().next())
  }

  /// Number of issues matching `jql`, without fetching any of them.
  pub async fn search_total(&self, jql: &str) -> Result<u64> {
    let query = [("jql", jql.to_string()), ("maxResults", "0".to_string())];
    let probe = self.get(SEARCH_PATH, &query).await?;
    probe
      .get("total")
      .and_then(Value::as_u64)
      .ok_or_else(|| JiraError::parse("search response has no total"))
  }

  async fn search_page(&self, jql: &str, start_at: u64, max_results: u64) -> Result<Value> {
    debug!(jql, start_at, max_results, "fetching search page");
    let query = [
      ("jql", jql.to_string()),
      ("startAt", start_at.to_string()),
      ("maxResults", max_results.to_string()),
    ];
    self.get(SEARCH_PATH, &query).await
  }
}
