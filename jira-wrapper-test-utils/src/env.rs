//! Environment variable management for testing
//!
//! Tests run on parallel threads of one process, so every guard holds a
//! process-wide lock while it is alive. Two guards must not be created on the
//! same thread at the same time.

use std::env;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Overrides one environment variable and restores the original value on drop.
pub struct EnvVarGuard {
  name: String,
  original: Option<String>,
  _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
  /// Take the environment lock and remember the current value of `name`.
  pub fn new(name: &str) -> Self {
    let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    Self {
      name: name.to_string(),
      original: env::var(name).ok(),
      _lock: lock,
    }
  }

  /// Set the variable for the lifetime of the guard.
  pub fn set(&self, value: &str) {
    // SAFETY: ENV_LOCK is held, so no other guard touches the environment.
    unsafe {
      env::set_var(&self.name, value);
    }
  }

  /// Unset the variable for the lifetime of the guard.
  pub fn remove(&self) {
    // SAFETY: ENV_LOCK is held, so no other guard touches the environment.
    unsafe {
      env::remove_var(&self.name);
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    match &self.original {
      // SAFETY: the lock is released only after this body runs.
      Some(value) => unsafe { env::set_var(&self.name, value) },
      // SAFETY: the lock is released only after this body runs.
      None => unsafe { env::remove_var(&self.name) },
    }
  }
}
