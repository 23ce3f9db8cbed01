//! # Credkit Core Library
//!
//! Credential holder for password-based authentication schemes, with the
//! password kept in protected memory and every read gated by a permission
//! check, plus generic identity and principal value types.
//!
//! ```
//! use credkit_core::{Credential, PermissionGate, SecretBackend};
//!
//! let credential = Credential::builder()
//!   .username("alice")
//!   .password("secret")
//!   .domain("CORP")
//!   .protector(SecretBackend::InMemory.protector())
//!   .gate(PermissionGate::allow_all())
//!   .build()?;
//!
//! assert_eq!(credential.username()?, "alice");
//! assert_eq!(credential.password()?, "secret");
//! # Ok::<(), credkit_core::CredentialError>(())
//! ```

pub mod config;
pub mod credential;
pub mod defaults;
pub mod error;
pub mod permission;
pub mod principal;
pub mod secret;

// Re-export main types
pub use config::{ConfigDirs, CredkitConfig};
pub use credential::{Credential, CredentialBuilder, CredentialSource};
pub use defaults::{default_gate, default_protector, install_defaults};
pub use error::{CredentialError, Result};
pub use permission::{AllowAll, DenyAll, GrantSet, Permission, PermissionGate, PermissionKind, PermissionPolicy};
pub use principal::{GenericIdentity, GenericPrincipal, Identity, Principal};
pub use secret::{InMemoryProtector, PlatformProtector, ProtectedSecret, SecretBackend, SecretProtector};
