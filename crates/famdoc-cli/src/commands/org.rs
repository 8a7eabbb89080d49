//! Organization commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use famdoc_core::user;

use super::Context;

#[derive(Subcommand)]
pub enum OrgCommands {
    /// Create an organization
    Create(CreateOrgArgs),

    /// List organizations
    List,
}

#[derive(Args)]
pub struct CreateOrgArgs {
    /// Organization name
    pub name: String,
}

pub async fn execute(cmd: OrgCommands, ctx: &Context) -> Result<()> {
    let pool = ctx.pool().await?;

    match cmd {
        OrgCommands::Create(args) => {
            let org = user::create_organization(&pool, &args.name).await?;
            println!("{} Created organization: {} ({})", "✓".green().bold(), org.name.cyan(), org.id.dimmed());
        }

        OrgCommands::List => {
            let orgs = user::list_organizations(&pool).await?;
            if orgs.is_empty() {
                println!("{}", "No organizations found.".dimmed());
            }
            for org in orgs {
                println!("{}  {}", org.id.dimmed(), org.name);
            }
        }
    }

    Ok(())
}
