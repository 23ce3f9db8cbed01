//! # Permission Gate
//!
//! Capability checks that guard every read of sensitive credential data.
//!
//! The process-wide permission objects describing each demand are created
//! lazily on first use, exactly once, and are read without locking from
//! then on. Whether a demand is satisfied is decided by a
//! [`PermissionPolicy`], which lets callers (and tests) run the same
//! credential code under full trust, no trust, or an explicit grant set.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CredentialError, Result};

/// Capability demanded before a sensitive value is returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionKind {
  /// Read the environment-derived domain name
  ReadDomainEnvInfo,
  /// Read the environment-derived user name
  ReadUserEnvInfo,
  /// Access unmanaged (protected) secret memory
  ReadUnmanagedSecret,
}

impl PermissionKind {
  pub const ALL: [PermissionKind; 3] = [
    PermissionKind::ReadDomainEnvInfo,
    PermissionKind::ReadUserEnvInfo,
    PermissionKind::ReadUnmanagedSecret,
  ];

  pub const fn as_str(self) -> &'static str {
    match self {
      PermissionKind::ReadDomainEnvInfo => "read-domain-env-info",
      PermissionKind::ReadUserEnvInfo => "read-user-env-info",
      PermissionKind::ReadUnmanagedSecret => "read-unmanaged-secret",
    }
  }
}

impl fmt::Display for PermissionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// What a permission demand protects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionTarget {
  /// Read access to a single environment variable
  EnvironmentVariable(&'static str),
  /// Access to unmanaged memory holding secret material
  UnmanagedCode,
}

/// A concrete permission demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
  kind: PermissionKind,
  target: PermissionTarget,
}

impl Permission {
  pub const fn kind(&self) -> PermissionKind {
    self.kind
  }

  pub const fn target(&self) -> PermissionTarget {
    self.target
  }
}

/// The static permission objects, one per [`PermissionKind`]
#[derive(Debug)]
struct Permissions {
  domain_env: Permission,
  user_env: Permission,
  unmanaged: Permission,
}

impl Permissions {
  const fn get(&self, kind: PermissionKind) -> &Permission {
    match kind {
      PermissionKind::ReadDomainEnvInfo => &self.domain_env,
      PermissionKind::ReadUserEnvInfo => &self.user_env,
      PermissionKind::ReadUnmanagedSecret => &self.unmanaged,
    }
  }
}

static PERMISSIONS: OnceLock<Permissions> = OnceLock::new();
static INITIALIZATIONS: AtomicUsize = AtomicUsize::new(0);

fn permissions() -> &'static Permissions {
  PERMISSIONS.get_or_init(|| {
    INITIALIZATIONS.fetch_add(1, Ordering::SeqCst);
    debug!("Initializing static permission objects");
    Permissions {
      domain_env: Permission {
        kind: PermissionKind::ReadDomainEnvInfo,
        target: PermissionTarget::EnvironmentVariable("USERDOMAIN"),
      },
      user_env: Permission {
        kind: PermissionKind::ReadUserEnvInfo,
        target: PermissionTarget::EnvironmentVariable("USERNAME"),
      },
      unmanaged: Permission {
        kind: PermissionKind::ReadUnmanagedSecret,
        target: PermissionTarget::UnmanagedCode,
      },
    }
  })
}

/// Look up the process-wide permission object for `kind`
pub fn permission_for(kind: PermissionKind) -> &'static Permission {
  permissions().get(kind)
}

/// Number of times the static permission objects have been built
pub fn initialization_count() -> usize {
  INITIALIZATIONS.load(Ordering::SeqCst)
}

/// Decides whether the current execution context satisfies a demand
pub trait PermissionPolicy: Send + Sync + fmt::Debug {
  fn allows(&self, permission: &Permission) -> bool;
}

/// Full trust: every demand succeeds
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl PermissionPolicy for AllowAll {
  fn allows(&self, _permission: &Permission) -> bool {
    true
  }
}

/// No trust: every demand fails
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

impl PermissionPolicy for DenyAll {
  fn allows(&self, _permission: &Permission) -> bool {
    false
  }
}

/// Grants exactly the listed permission kinds
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GrantSet {
  granted: BTreeSet<PermissionKind>,
}

impl GrantSet {
  pub fn new(granted: impl IntoIterator<Item = PermissionKind>) -> Self {
    Self {
      granted: granted.into_iter().collect(),
    }
  }

  /// Every known permission kind
  pub fn all() -> Self {
    Self::new(PermissionKind::ALL)
  }

  pub fn granted(&self) -> impl Iterator<Item = PermissionKind> + '_ {
    self.granted.iter().copied()
  }

  pub fn contains(&self, kind: PermissionKind) -> bool {
    self.granted.contains(&kind)
  }
}

impl PermissionPolicy for GrantSet {
  fn allows(&self, permission: &Permission) -> bool {
    self.granted.contains(&permission.kind())
  }
}

/// Checks permission demands against a [`PermissionPolicy`]
///
/// Cloning a gate is cheap; clones share the same policy.
#[derive(Debug, Clone)]
pub struct PermissionGate {
  policy: Arc<dyn PermissionPolicy>,
}

impl PermissionGate {
  pub fn new(policy: Arc<dyn PermissionPolicy>) -> Self {
    Self { policy }
  }

  pub fn allow_all() -> Self {
    Self::new(Arc::new(AllowAll))
  }

  pub fn deny_all() -> Self {
    Self::new(Arc::new(DenyAll))
  }

  /// Demand `kind`.
  ///
  /// # Errors
  ///
  /// Returns [`CredentialError::PermissionDenied`] carrying `kind` when the
  /// policy refuses the demand.
  pub fn check(&self, kind: PermissionKind) -> Result<()> {
    let permission = permission_for(kind);
    if self.policy.allows(permission) {
      return Ok(());
    }

    warn!(permission = %kind, "Permission demand failed");
    Err(CredentialError::PermissionDenied(kind))
  }
}

impl Default for PermissionGate {
  fn default() -> Self {
    Self::allow_all()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Barrier;
  use std::thread;

  use test_case::test_case;

  use super::*;

  #[test_case(PermissionKind::ReadDomainEnvInfo, PermissionTarget::EnvironmentVariable("USERDOMAIN"))]
  #[test_case(PermissionKind::ReadUserEnvInfo, PermissionTarget::EnvironmentVariable("USERNAME"))]
  #[test_case(PermissionKind::ReadUnmanagedSecret, PermissionTarget::UnmanagedCode)]
  fn test_static_permission_targets(kind: PermissionKind, target: PermissionTarget) {
    let permission = permission_for(kind);
    assert_eq!(permission.kind(), kind);
    assert_eq!(permission.target(), target);
  }

  #[test]
  fn test_concurrent_first_use_initializes_once() {
    const THREADS: usize = 16;
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
      .map(|_| {
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
          barrier.wait();
          let perms = permissions();
          assert_eq!(perms.get(PermissionKind::ReadUserEnvInfo).kind(), PermissionKind::ReadUserEnvInfo);
          perms as *const Permissions as usize
        })
      })
      .collect();

    let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(initialization_count(), 1);
  }

  #[test]
  fn test_allow_all_gate() {
    let gate = PermissionGate::allow_all();
    for kind in PermissionKind::ALL {
      assert!(gate.check(kind).is_ok());
    }
  }

  #[test]
  fn test_deny_all_gate_reports_kind() {
    let gate = PermissionGate::deny_all();
    for kind in PermissionKind::ALL {
      assert_eq!(gate.check(kind), Err(CredentialError::PermissionDenied(kind)));
    }
  }

  #[test]
  fn test_grant_set() {
    let gate = PermissionGate::new(Arc::new(GrantSet::new([PermissionKind::ReadUserEnvInfo])));
    assert!(gate.check(PermissionKind::ReadUserEnvInfo).is_ok());
    assert_eq!(
      gate.check(PermissionKind::ReadUnmanagedSecret),
      Err(CredentialError::PermissionDenied(PermissionKind::ReadUnmanagedSecret))
    );
  }

  #[test]
  fn test_grant_set_all() {
    let grants = GrantSet::all();
    assert_eq!(grants.granted().collect::<Vec<_>>(), PermissionKind::ALL.to_vec());
  }

  #[test]
  fn test_kind_serde_names() {
    let json = serde_json::to_string(&PermissionKind::ReadUnmanagedSecret).unwrap();
    assert_eq!(json, "\"read-unmanaged-secret\"");
    let kind: PermissionKind = serde_json::from_str("\"read-domain-env-info\"").unwrap();
    assert_eq!(kind, PermissionKind::ReadDomainEnvInfo);
  }
}
