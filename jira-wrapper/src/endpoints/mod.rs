//! # Jira API Endpoints
//!
//! Endpoint implementations grouped by resource: the field catalog, issue
//! search, transitions, issue mutations, assignable users and worklogs.

pub mod fields;
pub mod issues;
pub mod search;
pub mod transitions;
pub mod users;
pub mod worklog;

/// `rest/api/2/issue/{key}`, the target of every issue update.
pub(crate) fn issue_path(issue_key: &str) -> String {
  format!("rest/api/2/issue/{issue_key}")
}
