//! # Errors
//!
//! Error taxonomy shared by every credkit accessor and constructor.

use thiserror::Error;

use crate::permission::PermissionKind;

/// Errors surfaced by credential, secret and principal operations
///
/// None of these are retried or recovered internally. A failed call leaves
/// the object it was made on intact, so a later call under a different
/// permission policy or protector may still succeed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
  #[error("Invalid argument: '{0}' must not be absent")]
  InvalidArgument(&'static str),
  #[error("Permission denied: {0}")]
  PermissionDenied(PermissionKind),
  #[error("Protected memory is not supported on this platform: {0}")]
  UnsupportedPlatform(String),
  #[error("Protected memory operation failed: {0}")]
  Protection(String),
}

impl CredentialError {
  /// Returns the permission kind carried by a `PermissionDenied` error
  pub const fn denied_kind(&self) -> Option<PermissionKind> {
    match self {
      CredentialError::PermissionDenied(kind) => Some(*kind),
      _ => None,
    }
  }
}

pub type Result<T> = std::result::Result<T, CredentialError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_messages() {
    assert_eq!(
      CredentialError::InvalidArgument("name").to_string(),
      "Invalid argument: 'name' must not be absent"
    );
    assert_eq!(
      CredentialError::PermissionDenied(PermissionKind::ReadUnmanagedSecret).to_string(),
      "Permission denied: read-unmanaged-secret"
    );
  }

  #[test]
  fn test_denied_kind() {
    let err = CredentialError::PermissionDenied(PermissionKind::ReadUserEnvInfo);
    assert_eq!(err.denied_kind(), Some(PermissionKind::ReadUserEnvInfo));
    assert_eq!(CredentialError::InvalidArgument("identity").denied_kind(), None);
  }
}
