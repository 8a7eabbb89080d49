//! Family lookup commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use famdoc_core::family::{self, search::parse_search_input};

use super::{acting_user, Context};
use crate::output;

#[derive(Subcommand)]
pub enum FamilyCommands {
    /// Search families by number, as the family picker does
    Search(SearchArgs),
}

#[derive(Args)]
pub struct SearchArgs {
    /// Typed search input; "12" searches numbers 12 to 20
    pub input: String,

    /// Search as this user instead of unrestricted
    #[arg(long = "as")]
    pub as_user: Option<String>,
}

pub async fn execute(cmd: FamilyCommands, ctx: &Context) -> Result<()> {
    let pool = ctx.pool().await?;

    match cmd {
        FamilyCommands::Search(args) => {
            let range = match parse_search_input(&args.input) {
                Ok(range) => range,
                Err(e) => {
                    println!("{} {}", "!".yellow().bold(), e);
                    return Ok(());
                }
            };
            let actor = acting_user(&pool, args.as_user.as_deref()).await?;
            let families = family::list_families(&pool, &actor, Some(range)).await?;

            println!(
                "{} {} {}",
                "Numbers".bold(),
                format!("{}..={}", range.start, range.end).cyan(),
                format!("({} found)", families.len()).dimmed()
            );
            output::print_family_options(&families, chrono::Local::now().date_naive());
        }
    }

    Ok(())
}
