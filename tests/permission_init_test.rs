//! Runs in its own test binary so the static permission objects start out
//! uninitialized.

use std::sync::{Arc, Barrier};
use std::thread;

use credkit::permission::{initialization_count, permission_for};
use credkit::{Permission, PermissionGate, PermissionKind};

#[test]
fn test_concurrent_first_checks_initialize_once() {
  const THREADS: usize = 32;
  assert_eq!(initialization_count(), 0);

  let barrier = Arc::new(Barrier::new(THREADS));
  let gate = PermissionGate::allow_all();

  let handles: Vec<_> = (0..THREADS)
    .map(|i| {
      let barrier = Arc::clone(&barrier);
      let gate = gate.clone();
      thread::spawn(move || {
        barrier.wait();
        let kind = PermissionKind::ALL[i % PermissionKind::ALL.len()];
        gate.check(kind).expect("allow-all gate");
        let permission = permission_for(kind);
        assert_eq!(permission.kind(), kind);
        permission as *const Permission as usize
      })
    })
    .collect();

  let mut addresses: Vec<usize> = handles.into_iter().map(|h| h.join().expect("thread")).collect();
  addresses.sort_unstable();
  addresses.dedup();

  assert_eq!(initialization_count(), 1);
  assert_eq!(addresses.len(), PermissionKind::ALL.len());
}
