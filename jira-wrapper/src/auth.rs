//! Authentication helpers for the Jira client.
//!
//! Resolve the Jira host from `JIRA_HOST`, look up its credentials in
//! `~/.netrc` and build a ready client, optionally with a runtime for
//! synchronous callers.

use std::path::Path;

use anyhow::{Context, Result};
use jira_wrapper_core::Credentials;
use jira_wrapper_core::creds::netrc::{get_netrc_path, normalize_host, parse_netrc_file};
pub use jira_wrapper_core::url::ENV_JIRA_HOST;
use jira_wrapper_core::url::resolve_jira_base_url;
use tokio::runtime::Runtime;

use crate::{JiraClient, create_jira_client};

/// `.netrc` machine consulted when the host itself has no entry.
const FALLBACK_MACHINE: &str = "atlassian.net";

/// Get the $JIRA_HOST environment variable value.
/// If the host doesn't include a scheme (http:// or https://), assumes https://.
pub fn get_jira_host() -> Result<String> {
  resolve_jira_base_url()
}

/// Check if Jira credentials are available for the provided host.
pub fn check_jira_credentials(home: &Path, jira_host: &str) -> Result<bool> {
  Ok(get_jira_credentials(home, jira_host).is_ok())
}

/// Retrieve Jira credentials from `home/.netrc`, trying the host first and
/// `atlassian.net` second.
pub fn get_jira_credentials(home: &Path, jira_host: &str) -> Result<Credentials> {
  let netrc_path = get_netrc_path(home);

  let normalized_host = normalize_host(jira_host);
  if let Some(creds) = parse_netrc_file(&netrc_path, &normalized_host)? {
    return Ok(creds);
  }
  if let Some(creds) = parse_netrc_file(&netrc_path, FALLBACK_MACHINE)? {
    return Ok(creds);
  }

  Err(anyhow::anyhow!(
    "Jira credentials not found in .netrc file. Please add credentials for machine '{normalized_host}' or '{FALLBACK_MACHINE}'."
  ))
}

/// Creates an authenticated Jira client using credentials from .netrc.
pub fn create_jira_client_from_netrc(home: &Path, jira_host: &str) -> Result<JiraClient> {
  let credentials = get_jira_credentials(home, jira_host).context("Failed to get credentials")?;

  Ok(create_jira_client(
    jira_host,
    &credentials.username,
    &credentials.password,
  ))
}

/// Creates a client for `$JIRA_HOST` using the current user's `.netrc`.
pub fn create_jira_client_from_env() -> Result<JiraClient> {
  let home = jira_wrapper_core::home_dir()?;
  let jira_host = get_jira_host()?;
  create_jira_client_from_netrc(&home, &jira_host)
}

/// Creates a tokio runtime and an authenticated Jira client.
pub fn create_jira_runtime_and_client(home: &Path, jira_host: &str) -> Result<(Runtime, JiraClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = create_jira_client_from_netrc(home, jira_host)?;
  Ok((rt, client))
}
