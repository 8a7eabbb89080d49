//! User administration commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use famdoc_core::auth::{self, model::SignUpOutcome};
use famdoc_core::user::{
    self,
    model::{NewUser, Role, UserFilter},
};

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create the first ADMIN user for an email
    BootstrapAdmin(BootstrapArgs),

    /// List users
    List,
}

#[derive(Args)]
pub struct BootstrapArgs {
    /// Email address of the admin
    pub email: String,

    /// Display name
    #[arg(short, long)]
    pub name: Option<String>,
}

pub async fn execute(cmd: UserCommands, ctx: &Context) -> Result<()> {
    let pool = ctx.pool().await?;

    match cmd {
        UserCommands::BootstrapAdmin(args) => {
            let identity = match auth::sign_up(&pool, &args.email).await? {
                SignUpOutcome::Created(identity) => identity,
                SignUpOutcome::EmailAlreadyExists => auth::find_identity_by_email(&pool, &args.email)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Identity for {} vanished", args.email))?,
            };

            if let Some(existing) = user::find_user_by_auth_id(&pool, &identity.auth_id).await? {
                println!(
                    "{} {} already has a user ({})",
                    "!".yellow().bold(),
                    existing.email.cyan(),
                    existing.role.as_str()
                );
                return Ok(());
            }

            let new = NewUser {
                email: identity.email.clone(),
                name: args.name,
                role: Some(Role::Admin),
                organization_id: None,
            };
            let admin = user::create_user(&pool, &identity.auth_id, new, None).await?;
            println!(
                "{} Created admin: {} ({})",
                "✓".green().bold(),
                admin.email.cyan(),
                admin.id.dimmed()
            );
        }

        UserCommands::List => {
            let users = user::list_users(&pool, &UserFilter::default()).await?;
            output::print_users_table(&users);
        }
    }

    Ok(())
}
