//! Category commands

use anyhow::{anyhow, Result};
use clap::Subcommand;
use comfy_table::Cell;
use saldo_core::domain::CategoryPatch;
use saldo_core::{Category, EntryType};

use super::{confirm, get_context};
use crate::output;

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Only income or only expense categories
        #[arg(long = "type")]
        entry_type: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a category
    Add {
        name: String,
        /// income or expense
        #[arg(long = "type")]
        entry_type: String,
        #[arg(long, default_value = "")]
        icon: String,
    },
    /// Rename or change the icon of a category
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Remove a category no transaction uses
    Rm {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

fn parse_type(raw: &str) -> Result<EntryType> {
    raw.parse::<EntryType>().map_err(|e| anyhow!(e))
}

pub async fn run(command: CategoryCommands) -> Result<()> {
    let ctx = get_context().await?;

    match command {
        CategoryCommands::List { entry_type, json } => {
            let categories = match entry_type.as_deref() {
                Some(raw) => ctx.categories.list_by_type(parse_type(raw)?).await,
                None => ctx.categories.list().await,
            };
            if json {
                return output::print_json(&categories);
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Type", "Icon"]);
            for category in &categories {
                table.add_row(vec![
                    Cell::new(&category.id),
                    Cell::new(&category.name),
                    Cell::new(category.entry_type.as_str()),
                    Cell::new(&category.icon),
                ]);
            }
            println!("{}", table);
        }
        CategoryCommands::Add {
            name,
            entry_type,
            icon,
        } => {
            let category = Category::new(name, parse_type(&entry_type)?, icon);
            let category = ctx.categories.create(category).await?;
            output::success(&format!("Category '{}' created ({})", category.name, category.id));
        }
        CategoryCommands::Edit { id, name, icon } => {
            let category = ctx.categories.update(&id, CategoryPatch { name, icon }).await?;
            output::success(&format!("Category '{}' updated", category.name));
        }
        CategoryCommands::Rm { id, force } => {
            if !confirm(&format!("Remove category '{}'?", id), force)? {
                output::warning("Cancelled");
                return Ok(());
            }
            ctx.categories.delete(&id).await?;
            output::success(&format!("Category '{}' removed", id));
        }
    }
    Ok(())
}
