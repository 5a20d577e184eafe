//! Console formatting for progress, result and failure lines.
//!
//! Every workflow step prints a status line before it runs, so the last line
//! on screen locates a failure.

use console::style;

use crate::boundary::BoundaryWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("error:").red().bold(), style(message).red());
}

/// Format and print a success message in green.
pub fn display_success(message: &str) {
    println!("{}", style(format!(">> {}", message)).green());
}

/// Format and print a step announcement in cyan.
pub fn display_status(message: &str) {
    println!("{}", style(format!(">> {}", message)).cyan());
}

/// Format and print the line shown when the user backs out, in red.
pub fn display_aborted(message: &str) {
    println!("{}", style(format!(">> {}", message)).red());
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display release notes or a generated changelog block verbatim.
pub fn display_notes(notes: &str) {
    println!("{}", style(notes).cyan());
}

/// Render a confirmation prompt line.
pub fn format_prompt(prompt: &str) -> String {
    format!("{} [y|yes / n|no] ", style(prompt).yellow())
}
