//! CLI command implementations

pub mod account;
pub mod audit;
pub mod card;
pub mod category;
pub mod loan;
pub mod setup;
pub mod status;
pub mod transfer;
pub mod tx;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use dialoguer::Confirm;
use rust_decimal::Decimal;
use saldo_core::config::Config;
use saldo_core::SaldoContext;

/// Data directory from `SALDO_DIR` or the default
pub fn get_saldo_dir() -> Result<PathBuf> {
    Ok(Config::data_dir()?)
}

/// Open the context and load every store
pub async fn get_context() -> Result<SaldoContext> {
    let saldo_dir = get_saldo_dir()?;
    tracing::debug!(dir = %saldo_dir.display(), "opening ledger");
    let ctx = SaldoContext::new(&saldo_dir)
        .with_context(|| format!("Failed to open saldo data in {}", saldo_dir.display()))?;
    ctx.load_all().await.context("Failed to load ledger")?;
    Ok(ctx)
}

pub fn parse_amount(raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| anyhow!("Invalid amount: {}", raw))
}

/// Parse YYYY-MM-DD, defaulting to today
pub fn parse_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| anyhow!("Invalid date format. Use YYYY-MM-DD")),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|d| parse_date(Some(d))).transpose()
}

/// Ask before a destructive action unless `force` is set
pub fn confirm(prompt: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), Decimal::new(1250, 2));
        assert!(parse_amount("twelve").is_err());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date(Some("2024-02-29")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(parse_date(Some("29/02/2024")).is_err());
        assert!(parse_optional_date(None).unwrap().is_none());
    }
}
