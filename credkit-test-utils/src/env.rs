//! Environment variable management for testing
//!
//! This module provides utilities for managing the XDG config directory and
//! the credkit backend override during testing so tests don't interfere with
//! each other or with the user's real configuration.

use std::env;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use credkit_core::config::SECRET_BACKEND_ENV;
use tempfile::TempDir;

/// Serializes guards, since the process environment is global
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// A test environment that points XDG_CONFIG_HOME at a per-test temporary
/// directory and clears the secret backend override
pub struct EnvTestGuard {
  /// The temporary directory used for XDG_CONFIG_HOME
  pub temp_dir: TempDir,
  /// The original XDG_CONFIG_HOME value, if any
  original_config_home: Option<String>,
  /// The original CREDKIT_SECRET_BACKEND value, if any
  original_backend: Option<String>,
  _lock: MutexGuard<'static, ()>,
}

impl Default for EnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl EnvTestGuard {
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";

  /// Create a new test environment with an isolated config directory
  pub fn new() -> Self {
    let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    // Save original environment variables
    let original_config_home = env::var(Self::XDG_CONFIG_HOME).ok();
    let original_backend = env::var(SECRET_BACKEND_ENV).ok();

    let config_home = temp_dir.path().join("config");
    std::fs::create_dir_all(&config_home).expect("Failed to create config directory");

    unsafe {
      env::set_var(Self::XDG_CONFIG_HOME, &config_home);
      env::remove_var(SECRET_BACKEND_ENV);
    }

    Self {
      temp_dir,
      original_config_home,
      original_backend,
      _lock: lock,
    }
  }

  /// Get the path to the XDG config directory
  pub fn config_home(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }

  /// Set the secret backend override for the lifetime of this guard
  pub fn set_backend(&self, value: &str) {
    unsafe {
      env::set_var(SECRET_BACKEND_ENV, value);
    }
  }
}

impl Drop for EnvTestGuard {
  fn drop(&mut self) {
    // Restore original environment variables
    match &self.original_config_home {
      Some(val) => unsafe {
        env::set_var(EnvTestGuard::XDG_CONFIG_HOME, val);
      },
      None => unsafe {
        env::remove_var(EnvTestGuard::XDG_CONFIG_HOME);
      },
    }

    match &self.original_backend {
      Some(val) => unsafe {
        env::set_var(SECRET_BACKEND_ENV, val);
      },
      None => unsafe {
        env::remove_var(SECRET_BACKEND_ENV);
      },
    }
  }
}
