//! Protector for targets without a protected-memory facility

use zeroize::Zeroizing;

use crate::error::{CredentialError, Result};
use crate::secret::SecretProtector;

/// Host protected-memory facility. Unavailable on this target.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformProtector;

impl PlatformProtector {
  fn unsupported() -> CredentialError {
    CredentialError::UnsupportedPlatform(format!(
      "no protected-memory facility on {}; select the 'in-memory' secret backend explicitly",
      std::env::consts::OS
    ))
  }
}

impl SecretProtector for PlatformProtector {
  fn name(&self) -> &'static str {
    "platform"
  }

  fn seal(&self, _buf: &mut [u8]) -> Result<()> {
    Err(Self::unsupported())
  }

  fn unseal(&self, _buf: &mut [u8]) -> Result<()> {
    Err(Self::unsupported())
  }

  fn duplicate(&self, _sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    Err(Self::unsupported())
  }
}
