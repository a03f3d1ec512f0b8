//! Error types for the Jira client

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JiraError {
  /// The request never produced an HTTP response.
  #[error("Failed to reach Jira: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Authentication failed. Please check your Jira credentials.")]
  Authentication,

  #[error("{0} not found")]
  NotFound(String),

  /// Any other non-2xx response.
  #[error("Unexpected error: HTTP {status} - {message}")]
  Http { status: StatusCode, message: String },

  /// A response was missing a required value or had the wrong shape.
  #[error("Failed to parse Jira response: {0}")]
  Parse(String),

  #[error("Couldn't find a transition to '{destination}' for issue {issue_key}")]
  TransitionNotFound { issue_key: String, destination: String },

  /// The issue exists but a transition or link applied after creation failed.
  #[error("Issue {key} was created, but a follow-up step failed: {source}")]
  IncompleteCreate {
    key: String,
    #[source]
    source: Box<JiraError>,
  },
}

pub type Result<T, E = JiraError> = std::result::Result<T, E>;

impl JiraError {
  pub(crate) fn parse(message: impl Into<String>) -> Self {
    Self::Parse(message.into())
  }

  /// Key of the created issue when creation succeeded but a later step failed.
  pub fn created_key(&self) -> Option<&str> {
    match self {
      Self::IncompleteCreate { key, .. } => Some(key.as_str()),
      _ => None,
    }
  }
}

/// Flatten a Jira error body (`errorMessages` plus the `errors` map) into one
/// line, falling back to the raw body.
pub(crate) fn describe_error_body(body: &str) -> String {
  let Ok(json) = serde_json::from_str::<Value>(body) else {
    return body.trim().to_string();
  };

  let mut messages: Vec<String> = json
    .get("errorMessages")
    .and_then(Value::as_array)
    .map(|list| list.iter().filter_map(Value::as_str).map(str::to_string).collect())
    .unwrap_or_default();

  if let Some(errors) = json.get("errors").and_then(Value::as_object) {
    for (field, message) in errors {
      if let Some(message) = message.as_str() {
        messages.push(format!("{field}: {message}"));
      }
    }
  }

  if messages.is_empty() {
    body.trim().to_string()
  } else {
    messages.join("; ")
  }
}
