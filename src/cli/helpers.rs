//! Shared helper functions for CLI commands

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Resolve `Auto` to the format a command prefers
pub fn resolve_format(format: OutputFormat, auto: OutputFormat) -> OutputFormat {
    match format {
        OutputFormat::Auto => auto,
        f => f,
    }
}

/// Print a value as JSON or YAML; returns false for other formats
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// One `Label: value` line of a detail view
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("{}: {}", style(label).bold(), value);
}

pub fn print_opt_field<T: std::fmt::Display>(label: &str, value: Option<T>) {
    if let Some(v) = value {
        let text = v.to_string();
        if !text.trim().is_empty() {
            print_field(label, text);
        }
    }
}

pub fn rule() {
    println!("{}", style("─".repeat(60)).dim());
}

/// Success line unless quiet
pub fn success(quiet: bool, message: impl std::fmt::Display) {
    if !quiet {
        println!("{} {}", style("✓").green(), message);
    }
}

pub fn format_hours(hours: Option<f64>) -> String {
    match hours {
        Some(h) if h.fract() == 0.0 => format!("{:.0}h", h),
        Some(h) => format!("{:.1}h", h),
        None => "-".to_string(),
    }
}
