//! Process-wide defaults can only be installed once per process, so these
//! checks live in their own test binary and a single test.

use credkit::config::{PermissionsConfig, SecretsConfig};
use credkit::{Credential, CredentialError, CredkitConfig, PermissionKind, SecretBackend, install_defaults};

#[test]
fn test_installed_defaults_apply_to_new_credentials() {
  let config = CredkitConfig {
    secrets: SecretsConfig {
      backend: SecretBackend::InMemory,
    },
    permissions: PermissionsConfig {
      granted: vec![PermissionKind::ReadUserEnvInfo, PermissionKind::ReadUnmanagedSecret],
    },
  };
  install_defaults(&config).expect("first install");

  let err = install_defaults(&CredkitConfig::default()).unwrap_err();
  assert!(err.to_string().contains("already installed"));

  let cred = Credential::with_domain("alice", "secret", "CORP").unwrap();
  assert_eq!(cred.protector_name(), "in-memory");
  assert_eq!(cred.username().unwrap(), "alice");
  assert_eq!(cred.password().unwrap(), "secret");
  assert_eq!(
    cred.domain().unwrap_err(),
    CredentialError::PermissionDenied(PermissionKind::ReadDomainEnvInfo)
  );

  let empty = Credential::new();
  assert_eq!(empty.username().unwrap(), "");
  assert_eq!(empty.password().unwrap(), "");

  let two = Credential::with_password("bob", None).unwrap();
  assert_eq!(two.password().unwrap(), "");
}
