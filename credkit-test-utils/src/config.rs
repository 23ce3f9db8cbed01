//! Configuration directory fixtures for testing

use std::fs;
use std::path::PathBuf;

use credkit_core::ConfigDirs;
use tempfile::TempDir;

/// A temporary configuration directory, optionally seeded with a
/// `credkit.toml`
pub struct ConfigDirsTestGuard {
  /// Keeps the directory alive for the lifetime of the guard
  pub temp_dir: TempDir,
  dirs: ConfigDirs,
}

impl ConfigDirsTestGuard {
  /// Create an empty configuration directory
  pub fn new() -> anyhow::Result<Self> {
    let temp_dir = TempDir::new()?;
    let dirs = ConfigDirs::from_dir(temp_dir.path().join("credkit"));
    fs::create_dir_all(dirs.config_dir())?;
    Ok(Self { temp_dir, dirs })
  }

  /// Create a configuration directory whose `credkit.toml` holds `content`
  pub fn with_config(content: &str) -> anyhow::Result<Self> {
    let guard = Self::new()?;
    fs::write(guard.config_path(), content)?;
    Ok(guard)
  }

  /// The directories to hand to code under test
  pub fn dirs(&self) -> &ConfigDirs {
    &self.dirs
  }

  pub fn config_path(&self) -> PathBuf {
    self.dirs.config_path()
  }
}
