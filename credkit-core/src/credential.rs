//! # Credentials
//!
//! Username/password/domain triples for password-based authentication
//! schemes such as basic, digest, NTLM and Kerberos.
//!
//! The password is sealed as soon as it is set and is only ever unsealed on
//! demand. Reading any field goes through the credential's
//! [`PermissionGate`]; writing does not. Setting a secret needs no special
//! privilege while reading one does.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::defaults::{default_gate, default_protector};
use crate::error::Result;
use crate::permission::{PermissionGate, PermissionKind};
use crate::secret::{self, ProtectedSecret, SecretProtector};

/// Credentials for password-based authentication schemes
///
/// Not synchronized: mutation needs `&mut self`, so callers sharing a
/// credential across threads must bring their own lock.
pub struct Credential {
  username: String,
  domain: String,
  password: ProtectedSecret,
  protector: Arc<dyn SecretProtector>,
  gate: PermissionGate,
}

impl Credential {
  /// Empty username, password and domain, using the process-wide defaults
  pub fn new() -> Self {
    Self::empty_with(default_protector(), default_gate())
  }

  fn empty_with(protector: Arc<dyn SecretProtector>, gate: PermissionGate) -> Self {
    Self {
      username: String::new(),
      domain: String::new(),
      password: ProtectedSecret::empty(),
      protector,
      gate,
    }
  }

  /// Username and password with an empty domain
  pub fn with_password<'a>(
    username: impl Into<Option<&'a str>>,
    password: impl Into<Option<&'a str>>,
  ) -> Result<Self> {
    Self::builder().username(username).password(password).build()
  }

  /// Username, password and domain
  pub fn with_domain<'a>(
    username: impl Into<Option<&'a str>>,
    password: impl Into<Option<&'a str>>,
    domain: impl Into<Option<&'a str>>,
  ) -> Result<Self> {
    Self::builder()
      .username(username)
      .password(password)
      .domain(domain)
      .build()
  }

  /// Username and domain with a copy of an already protected password
  pub fn with_protected_password<'a>(
    username: impl Into<Option<&'a str>>,
    password: Option<&'a ProtectedSecret>,
    domain: impl Into<Option<&'a str>>,
  ) -> Result<Self> {
    let mut builder = Self::builder().username(username).domain(domain);
    if let Some(password) = password {
      builder = builder.protected_password(password);
    }
    builder.build()
  }

  pub fn builder<'a>() -> CredentialBuilder<'a> {
    CredentialBuilder::default()
  }

  /// The user name. Demands [`PermissionKind::ReadUserEnvInfo`].
  pub fn username(&self) -> Result<&str> {
    self.gate.check(PermissionKind::ReadUserEnvInfo)?;
    Ok(&self.username)
  }

  /// Set the user name; `None` stores an empty string
  pub fn set_username<'a>(&mut self, value: impl Into<Option<&'a str>>) {
    self.username = value.into().unwrap_or_default().to_owned();
  }

  /// The domain or realm. Demands [`PermissionKind::ReadDomainEnvInfo`].
  pub fn domain(&self) -> Result<&str> {
    self.gate.check(PermissionKind::ReadDomainEnvInfo)?;
    Ok(&self.domain)
  }

  /// Set the domain; `None` stores an empty string
  pub fn set_domain<'a>(&mut self, value: impl Into<Option<&'a str>>) {
    self.domain = value.into().unwrap_or_default().to_owned();
  }

  /// Unseal the password. Demands [`PermissionKind::ReadUnmanagedSecret`].
  ///
  /// A credential created without a password returns `""`.
  ///
  /// # Errors
  ///
  /// `PermissionDenied` when the gate refuses, `UnsupportedPlatform` when
  /// the protector cannot unseal on this host.
  pub fn password(&self) -> Result<String> {
    self.gate.check(PermissionKind::ReadUnmanagedSecret)?;
    secret::to_plaintext(&self.password)
  }

  /// Seal and store a new password; `None` stores the empty secret.
  ///
  /// No permission is demanded.
  pub fn set_password<'a>(&mut self, value: impl Into<Option<&'a str>>) -> Result<()> {
    self.password = secret::from_plaintext(value.into(), &self.protector)?;
    Ok(())
  }

  /// A copy of the protected password. Demands
  /// [`PermissionKind::ReadUnmanagedSecret`].
  pub fn protected_password(&self) -> Result<ProtectedSecret> {
    self.gate.check(PermissionKind::ReadUnmanagedSecret)?;
    secret::copy(&self.password)
  }

  /// Store a copy of `value`; `None` stores the empty secret
  pub fn set_protected_password(&mut self, value: Option<&ProtectedSecret>) -> Result<()> {
    self.password = match value {
      Some(secret) => secret::copy(secret)?,
      None => ProtectedSecret::empty(),
    };
    Ok(())
  }

  /// The gate consulted by read accessors
  pub const fn gate(&self) -> &PermissionGate {
    &self.gate
  }

  /// Replace the gate consulted by read accessors
  pub fn set_gate(&mut self, gate: PermissionGate) {
    self.gate = gate;
  }

  /// Name of the backend that seals new passwords
  pub fn protector_name(&self) -> &'static str {
    self.protector.name()
  }

  /// Independent copy, including a fresh copy of the protected password
  pub fn try_clone(&self) -> Result<Self> {
    Ok(Self {
      username: self.username.clone(),
      domain: self.domain.clone(),
      password: secret::copy(&self.password)?,
      protector: Arc::clone(&self.protector),
      gate: self.gate.clone(),
    })
  }
}

impl Default for Credential {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credential")
      .field("backend", &self.protector.name())
      .field("password_len", &self.password.len())
      .finish_non_exhaustive()
  }
}

/// Supplies credentials to authentication handlers for a request
pub trait CredentialSource {
  /// Credential to present for `uri` under the `auth_type` scheme, if any
  fn credential_for(&self, uri: &Url, auth_type: &str) -> Option<&Credential>;
}

/// A single credential answers every request with itself
impl CredentialSource for Credential {
  fn credential_for(&self, _uri: &Url, _auth_type: &str) -> Option<&Credential> {
    Some(self)
  }
}

enum PasswordInput<'a> {
  Plain(Option<&'a str>),
  Protected(&'a ProtectedSecret),
}

/// Builder for [`Credential`] with explicit protector and gate injection
#[derive(Default)]
pub struct CredentialBuilder<'a> {
  username: Option<&'a str>,
  domain: Option<&'a str>,
  password: Option<PasswordInput<'a>>,
  protector: Option<Arc<dyn SecretProtector>>,
  gate: Option<PermissionGate>,
}

impl<'a> CredentialBuilder<'a> {
  pub fn username(mut self, username: impl Into<Option<&'a str>>) -> Self {
    self.username = username.into();
    self
  }

  pub fn domain(mut self, domain: impl Into<Option<&'a str>>) -> Self {
    self.domain = domain.into();
    self
  }

  pub fn password(mut self, password: impl Into<Option<&'a str>>) -> Self {
    self.password = Some(PasswordInput::Plain(password.into()));
    self
  }

  /// Adopt a copy of an already protected password
  pub fn protected_password(mut self, password: &'a ProtectedSecret) -> Self {
    self.password = Some(PasswordInput::Protected(password));
    self
  }

  /// Protector used to seal the password now and on later `set_password`
  /// calls. Defaults to the process-wide protector.
  pub fn protector(mut self, protector: Arc<dyn SecretProtector>) -> Self {
    self.protector = Some(protector);
    self
  }

  /// Gate for read accessors. Defaults to the process-wide gate.
  pub fn gate(mut self, gate: PermissionGate) -> Self {
    self.gate = Some(gate);
    self
  }

  /// # Errors
  ///
  /// Fails when the password cannot be sealed with the chosen protector.
  pub fn build(self) -> Result<Credential> {
    let protector = self.protector.unwrap_or_else(default_protector);
    let gate = self.gate.unwrap_or_else(default_gate);

    let mut credential = Credential::empty_with(protector, gate);
    credential.set_username(self.username);
    match self.password {
      Some(PasswordInput::Plain(password)) => credential.set_password(password)?,
      Some(PasswordInput::Protected(password)) => credential.set_protected_password(Some(password))?,
      None => {}
    }
    credential.set_domain(self.domain);

    Ok(credential)
  }
}
