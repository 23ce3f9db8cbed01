//! # Protected Secrets
//!
//! Conversion between plaintext passwords and opaque [`ProtectedSecret`]
//! handles. The actual memory protection is delegated to a
//! [`SecretProtector`], so the same credential logic runs on top of the
//! platform facility (DPAPI on Windows) or the explicit in-memory fallback.
//!
//! Plaintext only ever lives in zeroizing scratch buffers for the duration
//! of a single call; [`to_plaintext`] hands back a conventional `String`
//! that the caller must not persist.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;
use zeroize::Zeroizing;

use crate::error::{CredentialError, Result};

mod memory;
pub mod platform;

pub use memory::InMemoryProtector;
pub use platform::PlatformProtector;

/// Capability that seals and unseals secret bytes in place
///
/// Implementations must be stateless with respect to individual secrets:
/// everything needed to unseal a buffer is either in the buffer itself or
/// bound to the current process.
pub trait SecretProtector: Send + Sync + fmt::Debug {
  /// Short backend name used in logs and diagnostics
  fn name(&self) -> &'static str;

  /// Buffers handed to [`seal`](Self::seal) are padded to a multiple of this
  fn block_size(&self) -> usize {
    1
  }

  /// Encrypt `buf` in place
  fn seal(&self, buf: &mut [u8]) -> Result<()>;

  /// Decrypt `buf` in place
  fn unseal(&self, buf: &mut [u8]) -> Result<()>;

  /// Produce an independent sealed copy of `sealed`
  fn duplicate(&self, sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    Ok(Zeroizing::new(sealed.to_vec()))
  }
}

/// Which [`SecretProtector`] backs newly created secrets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecretBackend {
  /// The host's protected-memory facility
  #[default]
  Platform,
  /// Plain zeroizing heap buffers, for hosts without a protected-memory
  /// facility
  InMemory,
}

impl SecretBackend {
  /// Instantiate the protector for this backend
  pub fn protector(self) -> Arc<dyn SecretProtector> {
    match self {
      SecretBackend::Platform => Arc::new(PlatformProtector),
      SecretBackend::InMemory => Arc::new(InMemoryProtector),
    }
  }

  pub const fn as_str(self) -> &'static str {
    match self {
      SecretBackend::Platform => "platform",
      SecretBackend::InMemory => "in-memory",
    }
  }
}

impl fmt::Display for SecretBackend {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for SecretBackend {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "platform" => Ok(SecretBackend::Platform),
      "in-memory" | "memory" => Ok(SecretBackend::InMemory),
      other => Err(format!("Unknown secret backend '{other}' (expected 'platform' or 'in-memory')")),
    }
  }
}

/// Opaque handle over a sealed secret
///
/// The sealed bytes are zeroed when the handle is dropped. An empty secret
/// carries no protector, so it can be created and read on any platform.
pub struct ProtectedSecret {
  sealed: Zeroizing<Vec<u8>>,
  byte_len: usize,
  char_len: usize,
  protector: Option<Arc<dyn SecretProtector>>,
}

impl ProtectedSecret {
  /// The zero-length secret
  pub fn empty() -> Self {
    Self {
      sealed: Zeroizing::new(Vec::new()),
      byte_len: 0,
      char_len: 0,
      protector: None,
    }
  }

  /// Seal `plaintext` with `protector`. Shorthand for [`from_plaintext`].
  pub fn new(plaintext: &str, protector: &Arc<dyn SecretProtector>) -> Result<Self> {
    from_plaintext(Some(plaintext), protector)
  }

  /// Length of the secret in characters
  pub const fn len(&self) -> usize {
    self.char_len
  }

  pub const fn is_empty(&self) -> bool {
    self.char_len == 0
  }

  /// Name of the backend that sealed this secret, if any
  pub fn backend_name(&self) -> Option<&'static str> {
    self.protector.as_ref().map(|p| p.name())
  }

  /// Independent copy with its own lifetime. See [`copy`].
  pub fn try_clone(&self) -> Result<Self> {
    copy(self)
  }
}

impl Default for ProtectedSecret {
  fn default() -> Self {
    Self::empty()
  }
}

impl fmt::Debug for ProtectedSecret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ProtectedSecret")
      .field("len", &self.char_len)
      .field("backend", &self.backend_name())
      .field("value", &"[REDACTED]")
      .finish()
  }
}

/// Seal a plaintext secret.
///
/// Absent or empty input yields [`ProtectedSecret::empty`] without touching
/// the protector.
///
/// # Errors
///
/// Returns [`CredentialError::UnsupportedPlatform`] when the protector has
/// no facility on this host, or [`CredentialError::Protection`] when the
/// facility itself fails.
pub fn from_plaintext(plaintext: Option<&str>, protector: &Arc<dyn SecretProtector>) -> Result<ProtectedSecret> {
  let Some(plain) = plaintext.filter(|s| !s.is_empty()) else {
    return Ok(ProtectedSecret::empty());
  };

  let block = protector.block_size().max(1);
  let padded_len = plain.len().div_ceil(block) * block;

  let mut sealed = Zeroizing::new(vec![0u8; padded_len]);
  sealed[..plain.len()].copy_from_slice(plain.as_bytes());
  protector.seal(&mut sealed)?;

  trace!(backend = protector.name(), "Sealed secret");

  Ok(ProtectedSecret {
    sealed,
    byte_len: plain.len(),
    char_len: plain.chars().count(),
    protector: Some(Arc::clone(protector)),
  })
}

/// Unseal a secret into a conventional string.
///
/// The empty secret yields `""`. The intermediate buffer is zeroed before
/// returning; the returned `String` is the caller's responsibility.
pub fn to_plaintext(secret: &ProtectedSecret) -> Result<String> {
  let Some(protector) = &secret.protector else {
    return Ok(String::new());
  };

  let mut scratch = Zeroizing::new(secret.sealed.to_vec());
  protector.unseal(&mut scratch)?;

  trace!(backend = protector.name(), "Unsealed secret");

  let text = std::str::from_utf8(&scratch[..secret.byte_len])
    .map_err(|e| CredentialError::Protection(format!("unsealed secret is not valid UTF-8: {e}")))?;
  Ok(text.to_owned())
}

/// Duplicate a sealed secret without exposing its plaintext
pub fn copy(secret: &ProtectedSecret) -> Result<ProtectedSecret> {
  let Some(protector) = &secret.protector else {
    return Ok(ProtectedSecret::empty());
  };

  let sealed = protector.duplicate(&secret.sealed)?;

  Ok(ProtectedSecret {
    sealed,
    byte_len: secret.byte_len,
    char_len: secret.char_len,
    protector: Some(Arc::clone(protector)),
  })
}

/// Seal and unseal a fixed probe value to check that `protector` works on
/// this host
pub fn probe(protector: &Arc<dyn SecretProtector>) -> Result<()> {
  const PROBE: &str = "credkit-probe";

  let sealed = from_plaintext(Some(PROBE), protector)?;
  let unsealed = Zeroizing::new(to_plaintext(&sealed)?);
  if unsealed.as_str() != PROBE {
    return Err(CredentialError::Protection(format!(
      "{} backend returned a different value than it sealed",
      protector.name()
    )));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use test_case::test_case;

  use super::*;

  /// Reversible XOR protector so tests can tell sealed bytes from plaintext
  #[derive(Debug, Default)]
  struct XorProtector {
    seals: AtomicUsize,
  }

  impl SecretProtector for XorProtector {
    fn name(&self) -> &'static str {
      "xor"
    }

    fn block_size(&self) -> usize {
      8
    }

    fn seal(&self, buf: &mut [u8]) -> Result<()> {
      self.seals.fetch_add(1, Ordering::SeqCst);
      buf.iter_mut().for_each(|b| *b ^= 0x5a);
      Ok(())
    }

    fn unseal(&self, buf: &mut [u8]) -> Result<()> {
      buf.iter_mut().for_each(|b| *b ^= 0x5a);
      Ok(())
    }
  }

  fn memory() -> Arc<dyn SecretProtector> {
    SecretBackend::InMemory.protector()
  }

  #[test_case("secret" ; "ascii")]
  #[test_case("pässwörd✓" ; "multibyte")]
  #[test_case(" spaced out " ; "whitespace")]
  fn test_round_trip(plain: &str) {
    let protector: Arc<dyn SecretProtector> = Arc::new(XorProtector::default());
    let sealed = from_plaintext(Some(plain), &protector).unwrap();
    assert_eq!(sealed.len(), plain.chars().count());
    assert_eq!(to_plaintext(&sealed).unwrap(), plain);
  }

  #[test]
  fn test_sealed_bytes_differ_from_plaintext() {
    let protector: Arc<dyn SecretProtector> = Arc::new(XorProtector::default());
    let sealed = from_plaintext(Some("hunter22"), &protector).unwrap();
    assert_ne!(&sealed.sealed[..8], b"hunter22");
  }

  #[test]
  fn test_padding_to_block_size() {
    let protector: Arc<dyn SecretProtector> = Arc::new(XorProtector::default());
    let sealed = from_plaintext(Some("abc"), &protector).unwrap();
    assert_eq!(sealed.sealed.len(), 8);
    assert_eq!(sealed.byte_len, 3);
    assert_eq!(to_plaintext(&sealed).unwrap(), "abc");
  }

  #[test]
  fn test_absent_and_empty_yield_empty_secret() {
    let protector: Arc<dyn SecretProtector> = Arc::new(XorProtector::default());

    for input in [None, Some("")] {
      let sealed = from_plaintext(input, &protector).unwrap();
      assert!(sealed.is_empty());
      assert_eq!(sealed.len(), 0);
      assert_eq!(sealed.backend_name(), None);
      assert_eq!(to_plaintext(&sealed).unwrap(), "");
    }
  }

  #[test]
  fn test_empty_secret_does_not_consult_protector() {
    let xor = Arc::new(XorProtector::default());
    let protector: Arc<dyn SecretProtector> = xor.clone();
    from_plaintext(None, &protector).unwrap();
    from_plaintext(Some(""), &protector).unwrap();
    assert_eq!(xor.seals.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn test_copy_is_independent() {
    let protector = memory();
    let original = from_plaintext(Some("shared"), &protector).unwrap();
    let copied = copy(&original).unwrap();
    drop(original);
    assert_eq!(to_plaintext(&copied).unwrap(), "shared");
    assert_eq!(copied.backend_name(), Some("in-memory"));
  }

  #[test]
  fn test_copy_of_empty() {
    let copied = ProtectedSecret::empty().try_clone().unwrap();
    assert!(copied.is_empty());
  }

  #[test]
  fn test_debug_is_redacted() {
    let secret = ProtectedSecret::new("topsecret", &memory()).unwrap();
    let rendered = format!("{secret:?}");
    assert!(!rendered.contains("topsecret"));
    insta::assert_snapshot!(rendered, @r#"ProtectedSecret { len: 9, backend: Some("in-memory"), value: "[REDACTED]" }"#);
  }

  #[test]
  fn test_backend_from_str() {
    assert_eq!("platform".parse::<SecretBackend>().unwrap(), SecretBackend::Platform);
    assert_eq!("In-Memory".parse::<SecretBackend>().unwrap(), SecretBackend::InMemory);
    assert_eq!(" memory ".parse::<SecretBackend>().unwrap(), SecretBackend::InMemory);
    assert!("plaintext".parse::<SecretBackend>().is_err());
  }

  #[test]
  fn test_probe_in_memory() {
    probe(&memory()).unwrap();
  }

  #[cfg(not(windows))]
  #[test]
  fn test_platform_backend_unsupported() {
    let protector = SecretBackend::Platform.protector();
    let err = from_plaintext(Some("secret"), &protector).unwrap_err();
    assert!(matches!(err, CredentialError::UnsupportedPlatform(_)));
    assert!(matches!(probe(&protector), Err(CredentialError::UnsupportedPlatform(_))));

    // The empty secret never needs the facility
    assert!(from_plaintext(None, &protector).unwrap().is_empty());
  }

  #[cfg(windows)]
  #[test]
  fn test_platform_backend_round_trip() {
    let protector = SecretBackend::Platform.protector();
    probe(&protector).unwrap();
    let sealed = from_plaintext(Some("windows-secret"), &protector).unwrap();
    assert_eq!(to_plaintext(&copy(&sealed).unwrap()).unwrap(), "windows-secret");
  }
}
