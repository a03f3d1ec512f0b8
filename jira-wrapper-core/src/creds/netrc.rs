//! Reading Jira credentials from `.netrc` files.
//!
//! Entries may be written on one line (`machine host login user password
//! token`) or spread across several lines; both forms are accepted.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::creds::Credentials;

/// Returns the path to the `.netrc` file inside `home`.
///
/// ```
/// use std::path::Path;
/// use jira_wrapper_core::creds::netrc::get_netrc_path;
///
/// assert_eq!(get_netrc_path(Path::new("/home/user")), Path::new("/home/user/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Looks up the credentials stored for `target_machine`.
///
/// Returns `Ok(None)` when the file has no entry for the machine or the entry
/// lacks a login or password. A missing file is also `Ok(None)`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn parse_netrc_file(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  if !path.exists() {
    debug!(path = %path.display(), "no .netrc file");
    return Ok(None);
  }
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let credentials = find_machine(&content, target_machine);
  debug!(machine = target_machine, found = credentials.is_some(), ".netrc lookup");
  Ok(credentials)
}

fn find_machine(content: &str, target_machine: &str) -> Option<Credentials> {
  let mut tokens = content.split_whitespace();
  let mut in_target = false;
  let mut username: Option<String> = None;
  let mut password: Option<String> = None;

  while let Some(token) = tokens.next() {
    match token {
      "machine" => {
        if in_target {
          break;
        }
        in_target = tokens.next() == Some(target_machine);
      }
      "default" if in_target => break,
      "login" => {
        let value = tokens.next();
        if in_target {
          username = value.map(str::to_string);
        }
      }
      "password" => {
        let value = tokens.next();
        if in_target {
          password = value.map(str::to_string);
        }
      }
      _ => {}
    }
  }

  match (username, password) {
    (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
      Some(Credentials { username, password })
    }
    _ => None,
  }
}

/// Strips the scheme and trailing slash from a Jira host so it can be used as
/// a `.netrc` machine name.
///
/// ```
/// use jira_wrapper_core::creds::netrc::normalize_host;
///
/// assert_eq!(normalize_host("https://company.atlassian.net/"), "company.atlassian.net");
/// assert_eq!(normalize_host("jira.example.com"), "jira.example.com");
/// ```
pub fn normalize_host(raw_host: &str) -> String {
  raw_host
    .trim()
    .trim_start_matches("https://")
    .trim_start_matches("http://")
    .trim_end_matches('/')
    .to_string()
}
