//! Process-wide default protector and permission gate
//!
//! Credentials built without an explicit protector or gate use these. They
//! are fixed the first time they are needed, either by
//! [`install_defaults`] at startup or implicitly as
//! [`PlatformProtector`](crate::secret::PlatformProtector) with full trust.

use std::sync::{Arc, OnceLock};

use anyhow::Result;
use tracing::debug;

use crate::config::CredkitConfig;
use crate::permission::PermissionGate;
use crate::secret::{SecretBackend, SecretProtector};

#[derive(Debug)]
struct Defaults {
  protector: Arc<dyn SecretProtector>,
  gate: PermissionGate,
}

static DEFAULTS: OnceLock<Defaults> = OnceLock::new();

fn defaults() -> &'static Defaults {
  DEFAULTS.get_or_init(|| {
    debug!("No defaults installed, using platform protector with full trust");
    Defaults {
      protector: SecretBackend::Platform.protector(),
      gate: PermissionGate::allow_all(),
    }
  })
}

/// Install the protector and gate described by `config` as process-wide
/// defaults.
///
/// # Errors
///
/// Fails if defaults were already installed or already used.
pub fn install_defaults(config: &CredkitConfig) -> Result<()> {
  let candidate = Defaults {
    protector: config.protector(),
    gate: config.gate(),
  };

  DEFAULTS
    .set(candidate)
    .map_err(|_rejected| anyhow::anyhow!("Credential defaults are already installed"))?;

  debug!(backend = %config.secrets.backend, "Installed credential defaults");
  Ok(())
}

/// The process-wide default protector
pub fn default_protector() -> Arc<dyn SecretProtector> {
  Arc::clone(&defaults().protector)
}

/// The process-wide default permission gate
pub fn default_gate() -> PermissionGate {
  defaults().gate.clone()
}
