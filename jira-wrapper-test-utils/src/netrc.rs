use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temporary home directory containing a `.netrc` with the given content.
///
/// The directory is removed when the guard is dropped. The process `HOME` is
/// left untouched; pass [`NetrcGuard::home_dir`] to the code under test.
pub struct NetrcGuard {
  temp_dir: TempDir,
  netrc_path: PathBuf,
}

impl NetrcGuard {
  /// Create a new home directory with a `.netrc` holding `content`
  pub fn new(content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let netrc_path = temp_dir.path().join(".netrc");
    fs::write(&netrc_path, content).expect("Failed to write test .netrc");

    Self { temp_dir, netrc_path }
  }

  /// Get the path to the .netrc file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }

  /// Get the path to the temporary home directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }
}
