//! # Jira Cloud REST Client
//!
//! Async client for a Jira Cloud instance: JQL search with pagination,
//! parsing of issues (including custom fields resolved against the field
//! catalog and optional worklogs), workflow transitions, and issue updates
//! such as comments, labels, assignment, priority and links.
//!
//! ```no_run
//! use jira_wrapper::{NewIssue, Priority, create_jira_client};
//!
//! # async fn run() -> jira_wrapper::Result<()> {
//! let client = create_jira_client("https://example.atlassian.net", "me@example.com", "api-token");
//! for issue in client.search("project = PROJ AND status = 'In Progress'", 50, false).await? {
//!   println!("{} {}", issue.key(), issue.summary());
//! }
//!
//! let key = client
//!   .create_issue(&NewIssue::new("PROJ", "Task", Priority::Medium, "Write the release notes").status("In Progress"))
//!   .await?;
//! client.comment_issue(&key, "Started").await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod client;
pub mod consts;
mod endpoints;
mod error;
pub mod models;
mod pagination;
mod parser;
mod requests;

// Re-export the client
pub use client::{JiraClient, create_jira_client};
pub use endpoints::search::SearchOptions;
pub use endpoints::transitions::resolve_transition;
pub use error::{JiraError, Result};
// Re-export models
pub use models::{
  Field, FieldCatalog, FieldValue, Issue, IssuePriority, IssueProject, IssueStatus, IssueType, IssueUser, JiraAuth,
  JiraUser, LinkedIssueSpec, ParentIssue, Priority, TransitionOption, WorklogEntry,
};
pub use parser::{parse_components, parse_custom_fields, parse_timestamp};
pub use requests::NewIssue;
