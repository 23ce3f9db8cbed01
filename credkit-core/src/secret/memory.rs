//! In-memory fallback protector
//!
//! Keeps secret bytes as-is in the zeroizing buffers owned by
//! [`ProtectedSecret`](super::ProtectedSecret). There is no encryption, so
//! this backend is only ever used when selected explicitly.

use super::SecretProtector;
use crate::error::Result;

/// Protector for hosts without a protected-memory facility
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryProtector;

impl SecretProtector for InMemoryProtector {
  fn name(&self) -> &'static str {
    "in-memory"
  }

  fn seal(&self, _buf: &mut [u8]) -> Result<()> {
    Ok(())
  }

  fn unseal(&self, _buf: &mut [u8]) -> Result<()> {
    Ok(())
  }
}
