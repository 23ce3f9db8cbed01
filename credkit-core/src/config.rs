//! # Configuration Management
//!
//! Loads the `credkit.toml` configuration that selects the secret backend
//! and the permission grants used by default, with XDG base directory
//! support.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::permission::{GrantSet, PermissionGate, PermissionKind};
use crate::secret::{SecretBackend, SecretProtector};

/// Environment variable that overrides `secrets.backend`
pub const SECRET_BACKEND_ENV: &str = "CREDKIT_SECRET_BACKEND";

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "credkit.toml";

/// Represents the configuration directories for credkit
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance from the platform project directories
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("dev", "", "credkit").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Use an explicit configuration directory
  pub fn from_dir(config_dir: impl Into<PathBuf>) -> Self {
    Self {
      config_dir: config_dir.into(),
    }
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the path to the configuration file
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE_NAME)
  }

  /// Create the configuration directory and a default configuration file if
  /// none exists yet
  pub fn init(&self) -> Result<()> {
    fs::create_dir_all(&self.config_dir).context("Failed to create config directory")?;

    let config_path = self.config_path();
    if !config_path.exists() {
      CredkitConfig::default().save_to(&config_path)?;
    }

    Ok(())
  }
}

/// Secret storage settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
  /// Backend used to seal new passwords
  pub backend: SecretBackend,
}

/// Permission grants applied by the default gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsConfig {
  pub granted: Vec<PermissionKind>,
}

impl Default for PermissionsConfig {
  fn default() -> Self {
    Self {
      granted: PermissionKind::ALL.to_vec(),
    }
  }
}

/// Top-level `credkit.toml` contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredkitConfig {
  pub secrets: SecretsConfig,
  pub permissions: PermissionsConfig,
}

impl CredkitConfig {
  /// Load configuration from the config directory, falling back to defaults
  /// when no file exists, then apply environment overrides
  pub fn load(dirs: &ConfigDirs) -> Result<Self> {
    let mut config = Self::load_from(&dirs.config_path())?;
    config.apply_env_overrides()?;
    Ok(config)
  }

  /// Load configuration from a specific file, or defaults if it is missing
  pub fn load_from(path: &Path) -> Result<Self> {
    if !path.exists() {
      debug!("No configuration file at {}, using defaults", path.display());
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
  }

  /// Save configuration into the config directory
  pub fn save(&self, dirs: &ConfigDirs) -> Result<()> {
    self.save_to(&dirs.config_path())
  }

  /// Save configuration to a specific file
  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let content = self.to_toml()?;
    fs::write(path, content).with_context(|| format!("Failed to write config to {}", path.display()))
  }

  /// Render as `credkit.toml` contents
  pub fn to_toml(&self) -> Result<String> {
    toml::to_string_pretty(self).context("Failed to serialize config")
  }

  /// Apply `CREDKIT_SECRET_BACKEND` if it is set
  pub fn apply_env_overrides(&mut self) -> Result<()> {
    match std::env::var(SECRET_BACKEND_ENV) {
      Ok(value) => self.apply_backend_override(&value),
      Err(_) => Ok(()),
    }
  }

  /// Replace the configured backend with one named by `value`
  pub fn apply_backend_override(&mut self, value: &str) -> Result<()> {
    let backend: SecretBackend = value
      .parse()
      .map_err(|e: String| anyhow::anyhow!(e))
      .with_context(|| format!("Invalid {SECRET_BACKEND_ENV} value"))?;
    debug!("Secret backend overridden to {backend}");
    self.secrets.backend = backend;
    Ok(())
  }

  /// Protector for the configured backend
  pub fn protector(&self) -> Arc<dyn SecretProtector> {
    self.secrets.backend.protector()
  }

  /// Gate granting exactly the configured permission kinds
  pub fn gate(&self) -> PermissionGate {
    PermissionGate::new(Arc::new(GrantSet::new(self.permissions.granted.iter().copied())))
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config = CredkitConfig::load_from(&temp.path().join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(config, CredkitConfig::default());
    assert_eq!(config.secrets.backend, SecretBackend::Platform);
    assert_eq!(config.permissions.granted, PermissionKind::ALL.to_vec());
  }

  #[test]
  fn test_parse_partial_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[secrets]\nbackend = \"in-memory\"\n").unwrap();

    let config = CredkitConfig::load_from(&path).unwrap();
    assert_eq!(config.secrets.backend, SecretBackend::InMemory);
    assert_eq!(config.permissions, PermissionsConfig::default());
  }

  #[test]
  fn test_save_and_reload() {
    let temp = TempDir::new().unwrap();
    let dirs = ConfigDirs::from_dir(temp.path().join("nested"));

    let config = CredkitConfig {
      secrets: SecretsConfig {
        backend: SecretBackend::InMemory,
      },
      permissions: PermissionsConfig {
        granted: vec![PermissionKind::ReadUserEnvInfo],
      },
    };
    config.save(&dirs).unwrap();

    let saved = fs::read_to_string(dirs.config_path()).unwrap();
    assert!(saved.contains("backend = \"in-memory\""));
    assert!(saved.contains("read-user-env-info"));

    assert_eq!(CredkitConfig::load_from(&dirs.config_path()).unwrap(), config);
  }

  #[test]
  fn test_init_writes_default_file_once() {
    let temp = TempDir::new().unwrap();
    let dirs = ConfigDirs::from_dir(temp.path());
    dirs.init().unwrap();
    assert!(dirs.config_path().exists());

    fs::write(dirs.config_path(), "[secrets]\nbackend = \"in-memory\"\n").unwrap();
    dirs.init().unwrap();
    let config = CredkitConfig::load_from(&dirs.config_path()).unwrap();
    assert_eq!(config.secrets.backend, SecretBackend::InMemory);
  }

  #[test]
  fn test_invalid_file_reports_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[secrets]\nbackend = \"plaintext\"\n").unwrap();

    let err = CredkitConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
  }

  #[test]
  fn test_backend_override() {
    let mut config = CredkitConfig::default();
    config.apply_backend_override("in-memory").unwrap();
    assert_eq!(config.secrets.backend, SecretBackend::InMemory);

    let err = config.apply_backend_override("vault").unwrap_err();
    assert!(err.to_string().contains(SECRET_BACKEND_ENV));
    assert_eq!(config.secrets.backend, SecretBackend::InMemory);
  }

  #[test]
  fn test_gate_follows_grants() {
    let config = CredkitConfig {
      permissions: PermissionsConfig {
        granted: vec![PermissionKind::ReadDomainEnvInfo],
      },
      ..Default::default()
    };
    let gate = config.gate();
    assert!(gate.check(PermissionKind::ReadDomainEnvInfo).is_ok());
    assert!(gate.check(PermissionKind::ReadUnmanagedSecret).is_err());
  }
}
