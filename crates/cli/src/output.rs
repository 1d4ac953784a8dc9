//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Parse a format name from the config file
    pub fn from_name(name: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(name, true)
            .map_err(|_| anyhow::anyhow!("Unknown output format '{}' (expected table or json)", name))
    }
}

/// Print a table from a list of items
pub fn print_table<T: Tabled + Serialize>(items: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", "No items found".yellow());
                return Ok(());
            }
            let table = Table::new(items).with(Style::rounded()).to_string();
            println!("{}", table);
            Ok(())
        }
        OutputFormat::Json => print_json(&items),
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Fill level as a percentage of capacity
pub fn format_fill_percent(filled: u32, capacity: u32) -> String {
    if capacity == 0 {
        return "-".to_string();
    }
    format!("{:.0}%", f64::from(filled) / f64::from(capacity) * 100.0)
}

/// Color a fill percentage: red when nearly full, yellow when past half
pub fn color_fill(filled: u32, capacity: u32) -> String {
    let formatted = format_fill_percent(filled, capacity);
    if capacity == 0 {
        return formatted;
    }
    let ratio = f64::from(filled) / f64::from(capacity);
    if ratio >= 0.8 {
        formatted.red().to_string()
    } else if ratio >= 0.5 {
        formatted.yellow().to_string()
    } else {
        formatted.green().to_string()
    }
}
