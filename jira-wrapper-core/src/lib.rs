//! # jira-wrapper core
//!
//! Configuration helpers for the Jira client: where the Jira instance lives
//! (`JIRA_HOST`) and which credentials to use for it (`~/.netrc`). Kept apart
//! from the client so callers can resolve configuration without pulling in
//! the HTTP stack.

pub mod creds;
pub mod url;

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::BaseDirs;

pub use creds::Credentials;
pub use url::{ENV_JIRA_HOST, ensure_url_scheme, resolve_jira_base_url};

/// Resolve the current user's home directory.
pub fn home_dir() -> Result<PathBuf> {
  let base_dirs = BaseDirs::new().context("Could not determine the home directory")?;
  Ok(base_dirs.home_dir().to_path_buf())
}
