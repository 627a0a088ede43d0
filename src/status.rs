// src/status.rs

//! User-facing status lines on STDOUT.
//!
//! Diagnostics go through `tracing` (STDERR); these helpers print the short
//! tagged lines a user watches while a build runs, e.g.
//!
//! ```text
//! [scss] dist/app.5f2b0c....css
//! ```

use std::fmt::Display;
use std::io::Write;

use colored::Colorize;

/// Width the tag column is padded to.
const TAG_WIDTH: usize = 4;

/// Format a tagged status line: the tag in bold cyan brackets, padded.
pub fn format_tagged(tag: &str, message: impl Display) -> String {
    let pad = " ".repeat(TAG_WIDTH.saturating_sub(tag.chars().count()));
    format!("[{}]{} {}", tag.cyan().bold(), pad, message)
}

/// Print a tagged status line.
pub fn tag(tag: &str, message: impl Display) {
    println!("{}", format_tagged(tag, message));
}

/// Clear the current terminal line (used before reprocessing in watch mode).
pub fn clear_line() {
    print!("\r\x1b[K");
    let _ = std::io::stdout().flush();
}

/// Print the idle watch-mode banner without a trailing newline.
pub fn watching() {
    print!("{}", "[Watching files]".dimmed());
    let _ = std::io::stdout().flush();
}
