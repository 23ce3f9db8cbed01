//! # Probe Command
//!
//! Reports whether the platform protected-memory facility and the configured
//! backend can seal and unseal secrets on this host.

use anyhow::Result;
use credkit_core::secret::{self, SecretBackend};
use credkit_core::{CredentialError, CredkitConfig};

use crate::output::{print_error, print_info, print_success, print_warning};

/// Handle the probe command
pub(crate) fn handle_probe_command() -> Result<()> {
  let (_dirs, config) = super::load_config()?;
  report_probe(&config);
  Ok(())
}

fn report_probe(config: &CredkitConfig) {
  match secret::probe(&SecretBackend::Platform.protector()) {
    Ok(()) => print_success("Platform protected memory is available."),
    Err(CredentialError::UnsupportedPlatform(reason)) => print_warning(&format!("Platform protected memory: {reason}")),
    Err(e) => print_error(&format!("Platform protected memory failed: {e}")),
  }

  let backend = config.secrets.backend;
  print_info(&format!("Configured secret backend: {backend}"));
  match secret::probe(&config.protector()) {
    Ok(()) => print_success(&format!("The '{backend}' backend can seal and unseal secrets.")),
    Err(e) => print_error(&format!("The '{backend}' backend is not usable: {e}")),
  }

  if backend == SecretBackend::InMemory {
    print_warning("Passwords are held in zeroizing memory without encryption.");
  }
}
