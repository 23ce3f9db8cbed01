//! # Output Formatting
//!
//! Formatted output functions with colors and emojis for user-facing
//! messages.

use owo_colors::OwoColorize;

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

impl ColorMode {
  /// Apply this mode to all subsequent colored output
  pub fn apply(self) {
    match self {
      ColorMode::Always | ColorMode::Yes => owo_colors::set_override(true),
      ColorMode::Never | ColorMode::No => owo_colors::set_override(false),
      ColorMode::Auto => {
        // Let owo_colors detect terminal support on its own
      }
    }
  }
}

const SUCCESS_EMOJI: &str = "heavy_check_mark";
const ERROR_EMOJI: &str = "x";
const WARNING_EMOJI: &str = "warning";
const INFO_EMOJI: &str = "information_source";

/// Emoji for a gemoji shortcode, or `default` when the shortcode is unknown
fn emoji_or(shortcode: &str, default: &str) -> String {
  emojis::get_by_shortcode(shortcode).map_or_else(|| default.to_string(), |emoji| emoji.to_string())
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = emoji_or(SUCCESS_EMOJI, "✓");
  println!("{} {}", check.green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  let cross = emoji_or(ERROR_EMOJI, "✗");
  eprintln!("{} {}", cross.red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  let warning = emoji_or(WARNING_EMOJI, "⚠");
  println!("{} {}", warning.yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = emoji_or(INFO_EMOJI, "ℹ");
  println!("{} {}", info.blue().bold(), message);
}

/// Print a section header
pub fn print_header(header: &str) {
  println!("\n{}", header.blue().bold());
}

/// Format a filesystem path
pub fn format_path(path: &str) -> String {
  path.bright_green().to_string()
}

/// Format a command or command example
pub fn format_command(cmd: &str) -> String {
  cmd.purple().to_string()
}

#[cfg(test)]
mod tests {
  use test_case::test_case;

  use super::*;

  #[test]
  fn test_unknown_shortcode_uses_default() {
    assert_eq!(emoji_or("definitely_not_an_emoji", "*"), "*");
  }

  #[test_case(SUCCESS_EMOJI ; "success")]
  #[test_case(ERROR_EMOJI ; "error")]
  #[test_case(WARNING_EMOJI ; "warning")]
  #[test_case(INFO_EMOJI ; "info")]
  fn test_message_shortcodes_resolve(shortcode: &str) {
    assert!(emojis::get_by_shortcode(shortcode).is_some(), "unknown shortcode {shortcode}");
  }
}
