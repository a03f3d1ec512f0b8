//! # Jira HTTP Client
//!
//! The transport adapter: every endpoint goes through [`JiraClient::request`],
//! which adds basic auth, sends JSON, and maps HTTP failures onto
//! [`JiraError`]. Nothing is retried.

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::consts;
use crate::error::{JiraError, Result, describe_error_body};
use crate::models::JiraAuth;

/// Query string pairs for a request
pub(crate) type Query<'a> = [(&'a str, String)];

/// Represents a Jira API client
pub struct JiraClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: JiraAuth,
}

impl JiraClient {
  /// Create a new Jira client
  pub fn new(base_url: &str, auth: JiraAuth) -> Self {
    let client = Client::new();
    Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      auth,
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Test the Jira connection by fetching the current user
  pub async fn test_connection(&self) -> Result<bool> {
    match self.get(consts::MYSELF_PATH, &[]).await {
      Ok(_) => Ok(true),
      Err(JiraError::Authentication) => Ok(false),
      Err(e) => Err(e),
    }
  }

  /// Send one request to `path` (relative to the base URL) and return the
  /// response body as JSON.
  ///
  /// A successful response with an empty body yields `Value::Null`.
  pub(crate) async fn request<B>(&self, method: Method, path: &str, query: &Query<'_>, body: Option<&B>) -> Result<Value>
  where
    B: Serialize + ?Sized,
  {
    let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
    debug!(%method, %url, ?query, "Jira request");

    let mut builder = self
      .client
      .request(method, &url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .header(ACCEPT, "application/json")
      .header(USER_AGENT, consts::USER_AGENT);
    if !query.is_empty() {
      builder = builder.query(query);
    }
    if let Some(body) = body {
      builder = builder.json(body);
    }

    let response = builder.send().await?;
    let status = response.status();
    debug!(%status, %url, "Jira response");

    match status {
      status if status.is_success() => {
        let text = response.text().await?;
        if text.trim().is_empty() {
          return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| JiraError::parse(format!("invalid JSON from {path}: {e}")))
      }
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(JiraError::Authentication),
      StatusCode::NOT_FOUND => Err(JiraError::NotFound(path.to_string())),
      _ => {
        let body = response.text().await.unwrap_or_default();
        Err(JiraError::Http {
          status,
          message: describe_error_body(&body),
        })
      }
    }
  }

  pub(crate) async fn get(&self, path: &str, query: &Query<'_>) -> Result<Value> {
    self.request::<Value>(Method::GET, path, query, None).await
  }

  pub(crate) async fn post<B>(&self, path: &str, query: &Query<'_>, body: &B) -> Result<Value>
  where
    B: Serialize + ?Sized,
  {
    self.request(Method::POST, path, query, Some(body)).await
  }

  pub(crate) async fn put<B>(&self, path: &str, body: &B) -> Result<Value>
  where
    B: Serialize + ?Sized,
  {
    self.request(Method::PUT, path, &[], Some(body)).await
  }
}

/// Create a Jira client from credentials
pub fn create_jira_client(base_url: &str, username: &str, api_token: &str) -> JiraClient {
  let auth = JiraAuth {
    username: username.to_string(),
    api_token: api_token.to_string(),
  };

  JiraClient::new(base_url, auth)
}

/// Deserialize a JSON value, reporting failures as [`JiraError::Parse`].
pub(crate) fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
  serde_json::from_value(value).map_err(|e| JiraError::parse(format!("{what}: {e}")))
}
