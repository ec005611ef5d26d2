//! CI log output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success
//! - Red: errors
//! - Cyan: hints
//! - Dimmed: labels

use console::style;
use std::fmt::Display;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a success message with checkmark (green).
///
/// Example: `✔ Success!`
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("✔").green(), style(msg).green());
    } else {
        println!("✔ {}", msg);
    }
}

/// Print an error message to stderr (red).
///
/// Example: `✖ missing required input: CONJUR_URL`
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✖").red(), style(msg).red());
    } else {
        eprintln!("✖ {}", msg);
    }
}

/// Print a hint message to stderr (cyan).
///
/// Example: `→ set CONJUR_URL in the pipe variables`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  env file  out/secrets.env`
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled() {
        println!("  {}  {}", style(label).dim(), style(value).bold());
    } else {
        println!("  {}  {}", label, value);
    }
}
