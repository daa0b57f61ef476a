//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print rows as a table, or the underlying records as JSON
pub fn print_rows<R: Tabled, T: Serialize>(
    rows: Vec<R>,
    records: &T,
    format: OutputFormat,
    empty_message: &str,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(records)?,
        OutputFormat::Table => {
            if rows.is_empty() {
                print_warning(empty_message);
                return Ok(());
            }
            let count = rows.len();
            println!("{}", Table::new(rows).with(Style::rounded()));
            println!("\nTotal: {}", count);
        }
    }
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Render an optional field, dashed when absent
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Mask all but the first character of a secret
pub fn mask_secret(secret: &str) -> String {
    match secret.chars().next() {
        Some(first) => format!("{}{}", first, "*".repeat(secret.chars().count() - 1)),
        None => String::new(),
    }
}

/// Color an orchestrator type; only OSM takes part in sync
pub fn color_kind(kind: &str) -> String {
    if kind.eq_ignore_ascii_case("osm") {
        kind.green().to_string()
    } else {
        kind.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("secret"), "s*****");
        assert_eq!(mask_secret("x"), "x");
        assert_eq!(mask_secret(""), "");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some("a")), "a");
        assert_eq!(or_dash(None), "-");
    }
}
