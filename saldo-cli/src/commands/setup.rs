//! Setup command - seed defaults for the configured user

use anyhow::Result;
use colored::Colorize;
use saldo_core::{OperationResult, SaldoContext};

use super::get_saldo_dir;
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let ctx = SaldoContext::new(&get_saldo_dir()?)?;
    let outcome = ctx.setup_service.setup_user().await;

    if json {
        let failed = outcome.is_err();
        let report = OperationResult::from(outcome)
            .with_context("data_dir", serde_json::json!(get_saldo_dir()?.display().to_string()));
        output::print_json(&report)?;
        if failed {
            std::process::exit(1);
        }
        return Ok(());
    }
    let result = outcome?;

    if result.seeded {
        output::success(&format!("User '{}' set up", result.user_id));
        println!("  {} default categories", result.categories);
        println!("  {} default accounts", result.accounts);
    } else {
        println!(
            "{}",
            format!("User '{}' already set up, nothing to do", result.user_id).dimmed()
        );
    }
    Ok(())
}
