use std::sync::Arc;

use super::{Identity, Principal};
use crate::error::{CredentialError, Result};

/// Principal backed by a caller-supplied identity and a fixed role list
#[derive(Debug, Clone)]
pub struct GenericPrincipal {
  identity: Arc<dyn Identity>,
  roles: Option<Vec<String>>,
}

impl GenericPrincipal {
  /// The roles are copied, so later changes to the caller's list have no
  /// effect. `None` means the principal has no role list at all.
  ///
  /// # Errors
  ///
  /// `InvalidArgument("identity")` when `identity` is absent.
  pub fn new<S: AsRef<str>>(identity: Option<Arc<dyn Identity>>, roles: Option<&[S]>) -> Result<Self> {
    let identity = identity.ok_or(CredentialError::InvalidArgument("identity"))?;
    let roles = roles.map(|roles| roles.iter().map(|r| r.as_ref().to_owned()).collect());

    Ok(Self { identity, roles })
  }

  /// The copied role list, if one was supplied
  pub fn roles(&self) -> Option<&[String]> {
    self.roles.as_deref()
  }
}

/// Ordinal comparison under simple upper-case folding. A char whose upper
/// case expands to several chars (`ß`, `ﬁ`) only matches itself.
fn eq_ignore_case(a: &str, b: &str) -> bool {
  if a.is_ascii() && b.is_ascii() {
    return a.eq_ignore_ascii_case(b);
  }
  a.chars().count() == b.chars().count() && a.chars().zip(b.chars()).all(|(x, y)| simple_upper(x) == simple_upper(y))
}

fn simple_upper(c: char) -> char {
  let mut upper = c.to_uppercase();
  match (upper.next(), upper.next()) {
    (Some(single), None) => single,
    _ => c,
  }
}

impl Principal for GenericPrincipal {
  fn identity(&self) -> &dyn Identity {
    self.identity.as_ref()
  }

  fn is_in_role(&self, role: Option<&str>) -> bool {
    let (Some(role), Some(roles)) = (role, &self.roles) else {
      return false;
    };
    roles.iter().any(|candidate| eq_ignore_case(candidate, role))
  }
}
