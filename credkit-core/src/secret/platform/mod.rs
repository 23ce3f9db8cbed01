//! Platform-specific protected memory
//!
//! On Windows secrets are sealed with DPAPI memory protection. Other targets
//! have no equivalent facility and report
//! [`UnsupportedPlatform`](crate::CredentialError::UnsupportedPlatform) for
//! every operation.

#[cfg(not(windows))]
mod unsupported;
#[cfg(windows)]
mod windows;

#[cfg(not(windows))]
pub use unsupported::PlatformProtector;
#[cfg(windows)]
pub use windows::PlatformProtector;
