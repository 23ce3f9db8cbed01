//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the credkit tool.

mod check;
mod config;
mod probe;
mod role;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use credkit_core::{ConfigDirs, CredkitConfig};

use crate::output::ColorMode;

/// Top-level CLI command for the credkit tool
#[derive(Parser)]
#[command(name = "credkit")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Inspect credential secret backends, permission grants and principals")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the credkit tool
#[derive(Subcommand)]
pub enum Commands {
  /// Check whether the platform secret facility works on this host
  #[command(long_about = "Seals and unseals a probe value with the platform protected-memory\n\
            facility and with the configured backend, and reports the result.")]
  Probe,

  /// Show or initialize configuration
  #[command(arg_required_else_help = true)]
  Config(config::ConfigArgs),

  /// Build a principal and test its role membership
  Role(role::RoleArgs),

  /// Build a credential with the configured backend and gate and report
  /// which fields can be read
  #[command(long_about = "Prompts for a password, builds a credential with the configured secret\n\
            backend and permission grants, and reports which accessors succeed.\n\
            The password itself is never printed.")]
  Check(check::CheckArgs),
}

/// Load configuration from the default location
fn load_config() -> Result<(ConfigDirs, CredkitConfig)> {
  let dirs = ConfigDirs::new()?;
  let config = CredkitConfig::load(&dirs)?;
  Ok((dirs, config))
}

/// Handle the parsed command line
pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  match cli.command {
    Commands::Probe => probe::handle_probe_command(),
    Commands::Config(config) => config::handle_config_command(config),
    Commands::Role(role) => role::handle_role_command(&role),
    Commands::Check(check) => check::handle_check_command(&check),
  }
}
