//! # Check Command
//!
//! Builds a credential with the configured secret backend and permission
//! grants and reports which accessors succeed, without printing the secret.

use anyhow::{Context, Result};
use clap::Args;
use credkit_core::{Credential, CredentialError, CredkitConfig};
use dialoguer::Password;
use tracing::info;
use zeroize::Zeroizing;

use crate::output::{print_header, print_success, print_warning};

/// Arguments for the check command
#[derive(Args)]
pub struct CheckArgs {
  /// User name for the credential
  #[arg(long)]
  pub username: String,

  /// Domain or realm for the credential
  #[arg(long)]
  pub domain: Option<String>,
}

/// Outcome of one accessor
#[derive(Debug, PartialEq, Eq)]
enum Access {
  Allowed,
  Denied(String),
}

#[derive(Debug)]
struct Report {
  username: Access,
  domain: Access,
  password: Access,
}

/// Handle the check command
pub(crate) fn handle_check_command(args: &CheckArgs) -> Result<()> {
  let (_dirs, config) = super::load_config()?;

  let password = Zeroizing::new(
    Password::new()
      .with_prompt(format!("Password for {}", args.username))
      .allow_empty_password(true)
      .interact()
      .context("Failed to read password")?,
  );

  let report = run_check(&config, args, &password)?;

  print_header("Accessor permissions");
  print_access("username", &report.username);
  print_access("domain", &report.domain);
  print_access("password", &report.password);
  Ok(())
}

/// Like [`check_credential`], but a missing protection facility also prints
/// a hint before the error is returned
fn run_check(config: &CredkitConfig, args: &CheckArgs, password: &str) -> Result<Report> {
  match check_credential(config, args, password) {
    Err(e @ CredentialError::UnsupportedPlatform(_)) => {
      print_warning("Set secrets.backend = \"in-memory\" in credkit.toml or CREDKIT_SECRET_BACKEND=in-memory.");
      Err(e).context("Cannot protect the password")
    }
    result => Ok(result?),
  }
}

fn check_credential(config: &CredkitConfig, args: &CheckArgs, password: &str) -> credkit_core::Result<Report> {
  let credential = Credential::builder()
    .username(args.username.as_str())
    .password(password)
    .domain(args.domain.as_deref())
    .protector(config.protector())
    .gate(config.gate())
    .build()?;

  info!(backend = credential.protector_name(), "Built credential");

  let password_access = match credential.password().map(Zeroizing::new) {
    Ok(unsealed) => {
      if unsealed.as_str() != password {
        return Err(CredentialError::Protection(
          "unsealed password differs from the one entered".to_string(),
        ));
      }
      Access::Allowed
    }
    Err(e) => access_from(Err(e))?,
  };

  Ok(Report {
    username: access_from(credential.username().map(drop))?,
    domain: access_from(credential.domain().map(drop))?,
    password: password_access,
  })
}

/// Denials become part of the report; every other error is returned
fn access_from(result: credkit_core::Result<()>) -> credkit_core::Result<Access> {
  match result {
    Ok(()) => Ok(Access::Allowed),
    Err(e @ CredentialError::PermissionDenied(_)) => Ok(Access::Denied(e.to_string())),
    Err(e) => Err(e),
  }
}

fn print_access(field: &str, access: &Access) {
  match access {
    Access::Allowed => print_success(&format!("{field}: readable")),
    Access::Denied(reason) => print_warning(&format!("{field}: {reason}")),
  }
}
