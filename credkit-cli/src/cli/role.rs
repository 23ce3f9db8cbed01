//! # Role Command
//!
//! Builds a generic principal from the command line and reports whether it
//! belongs to a role.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use credkit_core::{GenericIdentity, GenericPrincipal, Identity, Principal};

use crate::output::{print_info, print_success, print_warning};

/// Arguments for the role command
#[derive(Args)]
pub struct RoleArgs {
  /// Identity name; an empty name is an unauthenticated identity
  #[arg(long)]
  pub name: String,

  /// Authentication type tag, e.g. Basic or NTLM
  #[arg(long = "auth-type", default_value = "")]
  pub auth_type: String,

  /// Role held by the principal (can be used multiple times)
  #[arg(long = "role")]
  pub roles: Vec<String>,

  /// Role to test membership of (case-insensitive)
  #[arg(long)]
  pub check: String,
}

/// Handle the role command
pub(crate) fn handle_role_command(args: &RoleArgs) -> Result<()> {
  let principal = build_principal(args)?;
  let identity = principal.identity();

  if identity.is_authenticated() {
    print_info(&format!(
      "Identity '{}' is authenticated (type: '{}')",
      identity.name(),
      identity.authentication_type()
    ));
  } else {
    print_warning("Identity has an empty name and is not authenticated");
  }

  if principal.is_in_role(Some(&args.check)) {
    print_success(&format!("'{}' is in role '{}'", identity.name(), args.check));
  } else {
    print_warning(&format!("'{}' is not in role '{}'", identity.name(), args.check));
  }

  Ok(())
}

fn build_principal(args: &RoleArgs) -> Result<GenericPrincipal> {
  let identity: Arc<dyn Identity> = Arc::new(GenericIdentity::with_authentication_type(
    args.name.as_str(),
    args.auth_type.as_str(),
  )?);
  Ok(GenericPrincipal::new(Some(identity), Some(args.roles.as_slice()))?)
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;

  #[derive(Parser)]
  struct Harness {
    #[command(flatten)]
    role: RoleArgs,
  }

  #[test]
  fn test_build_principal_from_args() {
    let harness = Harness::try_parse_from([
      "role", "--name", "alice", "--auth-type", "NTLM", "--role", "Admin", "--role", "User", "--check", "admin",
    ])
    .unwrap();

    let principal = build_principal(&harness.role).unwrap();
    assert_eq!(principal.identity().authentication_type(), "NTLM");
    assert!(principal.is_in_role(Some(&harness.role.check)));
    assert!(!principal.is_in_role(Some("Superadmin")));
  }

  #[test]
  fn test_no_roles_given() {
    let harness = Harness::try_parse_from(["role", "--name", "", "--check", "admin"]).unwrap();
    let principal = build_principal(&harness.role).unwrap();
    assert!(!principal.identity().is_authenticated());
    assert!(!principal.is_in_role(Some("admin")));
  }
}
