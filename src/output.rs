//! CLI output formatting for conversions and the menu.
//!
//! # Output Format
//!
//! ## Convert
//!
//! ```text
//! Converted index.jemdoc to index.html
//! Converted index_cn.jemdoc to index_cn.html
//! Failed research.jemdoc: Failed to write research.html: Permission denied
//! ```
//!
//! Missing inputs produce no line at all. Paths are shown relative to the
//! source directory when they live under it.
//!
//! ## Menu
//!
//! ```text
//! Menu
//!     Home → index.html
//!     Research → research.html
//! Language
//!     中文 → index_cn.html
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes it out. Format functions
//! are pure: no I/O, no side effects.

use crate::generate::ConvertOutcome;
use crate::types::MenuEntry;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display a path relative to `root` when it is inside it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Convert
// ============================================================================

/// Format the line for one conversion. Skipped inputs print nothing.
pub fn format_outcome(outcome: &ConvertOutcome, root: &Path) -> Vec<String> {
    match outcome {
        ConvertOutcome::Converted { input, output } => vec![format!(
            "Converted {} to {}",
            display_path(input, root),
            display_path(output, root)
        )],
        ConvertOutcome::Skipped { .. } => Vec::new(),
        ConvertOutcome::Failed { input, error } => {
            vec![format!("Failed {}: {}", display_path(input, root), error)]
        }
    }
}

/// Print outcomes in order: confirmations to stdout, failures to stderr.
pub fn print_outcomes(outcomes: &[ConvertOutcome], root: &Path) {
    for outcome in outcomes {
        for line in format_outcome(outcome, root) {
            if matches!(outcome, ConvertOutcome::Failed { .. }) {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
    }
}

// ============================================================================
// Menu
// ============================================================================

/// Format parsed menu entries as an indented tree.
pub fn format_menu(entries: &[MenuEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in entries {
        match entry {
            MenuEntry::Category { name } => lines.push(name.clone()),
            MenuEntry::Item {
                category,
                url,
                text,
            } => {
                let depth = usize::from(!category.is_empty());
                lines.push(format!("{}{} → {}", indent(depth), text, url));
            }
        }
    }
    lines
}

pub fn print_menu(entries: &[MenuEntry]) {
    for line in format_menu(entries) {
        println!("{}", line);
    }
}
