//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::fmt::Display;

use colored::{ColoredString, Colorize};

use crate::domain::SelectionState;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print one validation problem: red X, kind, offending id.
pub fn problem(kind: &str, id: &(impl Display + ?Sized)) {
    println!("  {} {}: {}", "✗".red(), kind, id.to_string().bold());
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}

/// Checkbox marker colored by state.
pub fn marker(state: SelectionState, text: &str) -> ColoredString {
    match state {
        SelectionState::Selected => text.green().bold(),
        SelectionState::Indeterminate => text.yellow(),
        SelectionState::Unselected => text.dimmed(),
    }
}
