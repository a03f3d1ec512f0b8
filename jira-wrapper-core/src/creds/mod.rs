//! # Credential Management
//!
//! Basic-auth credentials for a Jira instance. The only backend is a
//! `.netrc` file in the user's home directory.

pub mod netrc;

/// Username and API token pair for a Jira host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}
