//! # Config Command
//!
//! Show the effective configuration or write a default `credkit.toml`.

use anyhow::Result;
use clap::{Args, Subcommand};
use credkit_core::{ConfigDirs, CredkitConfig, PermissionKind};

use crate::output::{format_command, format_path, print_header, print_info, print_success};

/// Command for configuration management
#[derive(Args)]
pub struct ConfigArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: ConfigSubcommands,
}

/// Subcommands for the config command
#[derive(Subcommand)]
pub enum ConfigSubcommands {
  /// Print the effective configuration, including environment overrides
  Show,

  /// Create the configuration directory and a default credkit.toml
  Init,
}

/// Handle the config command
pub(crate) fn handle_config_command(args: ConfigArgs) -> Result<()> {
  match args.subcommand {
    ConfigSubcommands::Show => {
      let (dirs, config) = super::load_config()?;
      show_config(&dirs, &config)
    }
    ConfigSubcommands::Init => {
      let dirs = ConfigDirs::new()?;
      init_config(&dirs)
    }
  }
}

fn show_config(dirs: &ConfigDirs, config: &CredkitConfig) -> Result<()> {
  let path = dirs.config_path();
  if path.exists() {
    print_info(&format!("Configuration file: {}", format_path(&path.display().to_string())));
  } else {
    print_info(&format!(
      "No configuration file at {}, showing defaults. Create one with {}.",
      format_path(&path.display().to_string()),
      format_command("credkit config init")
    ));
  }

  print_header("Effective configuration");
  println!("{}", config.to_toml()?);

  print_header("Permission grants");
  for kind in PermissionKind::ALL {
    let state = if config.permissions.granted.contains(&kind) {
      "granted"
    } else {
      "denied"
    };
    println!("  {kind}: {state}");
  }

  Ok(())
}

fn init_config(dirs: &ConfigDirs) -> Result<()> {
  let existed = dirs.config_path().exists();
  dirs.init()?;

  let path = dirs.config_path().display().to_string();
  if existed {
    print_info(&format!("Configuration already exists at {}", format_path(&path)));
  } else {
    print_success(&format!("Wrote default configuration to {}", format_path(&path)));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use credkit_core::SecretBackend;
  use credkit_test_utils::ConfigDirsTestGuard;

  use super::*;

  #[test]
  fn test_init_creates_file() {
    let guard = ConfigDirsTestGuard::new().unwrap();
    init_config(guard.dirs()).unwrap();
    assert!(guard.config_path().exists());
  }

  #[test]
  fn test_rendered_config_lists_grants() {
    let guard = ConfigDirsTestGuard::with_config("[secrets]\nbackend = \"in-memory\"\n").unwrap();
    let config = CredkitConfig::load_from(&guard.config_path()).unwrap();
    assert_eq!(config.secrets.backend, SecretBackend::InMemory);

    let rendered = config.to_toml().unwrap();
    assert!(rendered.contains("in-memory"));
    assert!(rendered.contains("read-unmanaged-secret"));
  }
}
