//! Jira base URL resolution.

use anyhow::{Context, Result};
use url::{Position, Url};

/// Environment variable storing the Jira host configuration.
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";

/// Read `$JIRA_HOST` and return it as a base URL with a scheme.
///
/// Returns an error if the variable is unset or cannot be parsed as a URL.
pub fn resolve_jira_base_url() -> Result<String> {
  let host = std::env::var(ENV_JIRA_HOST)
    .with_context(|| format!("Jira host environment variable '{ENV_JIRA_HOST}' not set"))?;
  ensure_url_scheme(&host)
}

/// Ensure a host has an `http://` or `https://` scheme, assuming `https://`.
///
/// Malformed schemes such as `https:/host` are repaired, and a bare trailing
/// `/` path is dropped so the result can be used as a base for
/// `format!("{base}/rest/...")`.
pub fn ensure_url_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow::anyhow!("Host cannot be empty"));
  }

  let (scheme, rest) = match trimmed.split_once(':') {
    Some((scheme, rest)) if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") => {
      (scheme.to_ascii_lowercase(), rest.trim_start_matches('/'))
    }
    _ => ("https".to_string(), trimmed),
  };

  if rest.is_empty() {
    return Err(anyhow::anyhow!("Failed to parse URL: '{input}'. No host given."));
  }

  let url = Url::parse(&format!("{scheme}://{rest}"))
    .map_err(|e| anyhow::anyhow!("Failed to parse URL: '{input}'. Ensure it has a valid scheme ({e})."))?;
  if url.host().is_none() {
    return Err(anyhow::anyhow!("Failed to parse URL: '{input}'. No host given."));
  }

  Ok(normalize_url(&url))
}

fn normalize_url(url: &Url) -> String {
  let mut result = url[..Position::BeforePath].to_string();
  let path = url.path().trim_end_matches('/');
  result.push_str(path);
  if let Some(query) = url.query() {
    result.push('?');
    result.push_str(query);
  }
  result
}

#[cfg(test)]
mod tests {
  use jira_wrapper_test_utils::EnvVarGuard;

  use super::*;

  #[test]
  fn test_ensure_url_scheme_keeps_existing_scheme() {
    assert_eq!(
      ensure_url_scheme("https://company.atlassian.net").unwrap(),
      "https://company.atlassian.net"
    );
    assert_eq!(
      ensure_url_scheme("http://jira.example.com").unwrap(),
      "http://jira.example.com"
    );
  }

  #[test]
  fn test_ensure_url_scheme_defaults_to_https() {
    assert_eq!(
      ensure_url_scheme("company.atlassian.net").unwrap(),
      "https://company.atlassian.net"
    );
    assert_eq!(ensure_url_scheme("localhost:8080").unwrap(), "https://localhost:8080");
    assert_eq!(ensure_url_scheme("192.168.1.100").unwrap(), "https://192.168.1.100");
  }

  #[test]
  fn test_ensure_url_scheme_repairs_malformed_scheme() {
    assert_eq!(
      ensure_url_scheme("https:/company.atlassian.net").unwrap(),
      "https://company.atlassian.net"
    );
    assert_eq!(ensure_url_scheme("HTTP:jira.local").unwrap(), "http://jira.local");
  }

  #[test]
  fn test_ensure_url_scheme_strips_trailing_slash() {
    assert_eq!(
      ensure_url_scheme("https://company.atlassian.net/").unwrap(),
      "https://company.atlassian.net"
    );
    assert_eq!(
      ensure_url_scheme("https://example.com/jira/").unwrap(),
      "https://example.com/jira"
    );
  }

  #[test]
  fn test_ensure_url_scheme_rejects_empty() {
    let error = ensure_url_scheme("   ").unwrap_err().to_string();
    assert!(error.contains("Host cannot be empty"));
    assert!(ensure_url_scheme("https://").is_err());
  }

  #[test]
  fn test_resolve_jira_base_url() {
    let guard = EnvVarGuard::new(ENV_JIRA_HOST);

    guard.set("company.atlassian.net");
    assert_eq!(resolve_jira_base_url().unwrap(), "https://company.atlassian.net");

    guard.remove();
    let error = resolve_jira_base_url().unwrap_err().to_string();
    assert!(error.contains(ENV_JIRA_HOST));
  }
}
