//! Scripted permission policies for testing

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use credkit_core::{Permission, PermissionKind, PermissionPolicy};

/// Policy that denies a chosen set of kinds and records every demand
#[derive(Debug, Default)]
pub struct ScriptedPolicy {
  denied: Mutex<BTreeSet<PermissionKind>>,
  checks: AtomicUsize,
}

impl ScriptedPolicy {
  /// Allow everything until told otherwise
  pub fn new() -> Self {
    Self::default()
  }

  /// Deny the given kinds from the start
  pub fn denying(kinds: impl IntoIterator<Item = PermissionKind>) -> Self {
    let policy = Self::new();
    for kind in kinds {
      policy.deny(kind);
    }
    policy
  }

  pub fn deny(&self, kind: PermissionKind) {
    self.denied.lock().expect("policy lock poisoned").insert(kind);
  }

  pub fn allow(&self, kind: PermissionKind) {
    self.denied.lock().expect("policy lock poisoned").remove(&kind);
  }

  /// Number of demands seen so far
  pub fn checks(&self) -> usize {
    self.checks.load(Ordering::SeqCst)
  }
}

impl PermissionPolicy for ScriptedPolicy {
  fn allows(&self, permission: &Permission) -> bool {
    self.checks.fetch_add(1, Ordering::SeqCst);
    !self
      .denied
      .lock()
      .expect("policy lock poisoned")
      .contains(&permission.kind())
  }
}
