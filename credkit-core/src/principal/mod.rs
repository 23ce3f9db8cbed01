//! # Identities and Principals
//!
//! Name/role view of an authenticated actor. [`Identity`] describes who the
//! actor is and how it authenticated; [`Principal`] adds role membership.
//! The generic implementations are plain value objects and never interact
//! with [`Credential`](crate::Credential).

mod generic_identity;
mod generic_principal;

pub use generic_identity::GenericIdentity;
pub use generic_principal::GenericPrincipal;

/// Who an actor is and how it authenticated
pub trait Identity: Send + Sync + std::fmt::Debug {
  fn name(&self) -> &str;

  /// Authentication scheme tag, e.g. `"Basic"` or `"NTLM"`. Empty when
  /// unknown.
  fn authentication_type(&self) -> &str;

  fn is_authenticated(&self) -> bool;
}

/// An identity together with its role memberships
pub trait Principal: Send + Sync {
  fn identity(&self) -> &dyn Identity;

  /// Whether the principal belongs to `role`. `None` is never a member.
  fn is_in_role(&self, role: Option<&str>) -> bool;
}
