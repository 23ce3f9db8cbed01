use serde::{Deserialize, Serialize};

use super::Identity;
use crate::error::{CredentialError, Result};

/// Identity with a name and an authentication type tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericIdentity {
  name: String,
  #[serde(default)]
  authentication_type: String,
}

impl GenericIdentity {
  /// Identity with an empty authentication type
  ///
  /// # Errors
  ///
  /// `InvalidArgument("name")` when `name` is absent.
  pub fn new<'a>(name: impl Into<Option<&'a str>>) -> Result<Self> {
    Self::with_authentication_type(name, "")
  }

  /// # Errors
  ///
  /// `InvalidArgument` naming whichever argument is absent.
  pub fn with_authentication_type<'a>(
    name: impl Into<Option<&'a str>>,
    authentication_type: impl Into<Option<&'a str>>,
  ) -> Result<Self> {
    let name = name.into().ok_or(CredentialError::InvalidArgument("name"))?;
    let authentication_type = authentication_type
      .into()
      .ok_or(CredentialError::InvalidArgument("authentication_type"))?;

    Ok(Self {
      name: name.to_owned(),
      authentication_type: authentication_type.to_owned(),
    })
  }
}

impl Identity for GenericIdentity {
  fn name(&self) -> &str {
    &self.name
  }

  fn authentication_type(&self) -> &str {
    &self.authentication_type
  }

  fn is_authenticated(&self) -> bool {
    !self.name.is_empty()
  }
}
