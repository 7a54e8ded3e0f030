//! Output formatting utilities

use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, Color, ContentArrangement, Table};
use rust_decimal::Decimal;
use serde::Serialize;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Two-decimal amount, red when negative
pub fn money(amount: Decimal) -> ColoredString {
    let text = format!("{:.2}", amount);
    if amount < Decimal::ZERO {
        text.red()
    } else {
        text.normal()
    }
}

/// Right-aligned amount cell, red when negative
pub fn money_cell(amount: Decimal) -> Cell {
    let cell = Cell::new(format!("{:.2}", amount)).set_alignment(CellAlignment::Right);
    if amount < Decimal::ZERO {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_keeps_two_decimals() {
        colored::control::set_override(false);
        assert_eq!(money(Decimal::new(5, 0)).to_string(), "5.00");
        assert_eq!(money(Decimal::new(-1250, 2)).to_string(), "-12.50");
    }
}
