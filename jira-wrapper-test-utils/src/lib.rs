//! Test utilities shared across the jira-wrapper workspace
//!
//! - environment variable isolation ([`EnvVarGuard`])
//! - throwaway home directories with a `.netrc` ([`NetrcGuard`])
//! - JSON payloads shaped like Jira Cloud responses ([`fixtures`])
//! - a tracing subscriber for test output ([`init_test_tracing`])
//!
//! The dead_code lint is disabled because not every test crate uses every
//! helper.

#![allow(dead_code)]

pub mod env;
pub mod fixtures;
pub mod netrc;

use tracing_subscriber::EnvFilter;

pub use env::EnvVarGuard;
pub use netrc::NetrcGuard;

/// Install a test-friendly tracing subscriber.
///
/// Honors `RUST_LOG` and defaults to `warn`. Safe to call from every test;
/// only the first call installs the subscriber.
pub fn init_test_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_test_writer()
    .try_init()
    .ok();
}
