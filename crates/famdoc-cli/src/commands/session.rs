//! Development session tokens.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use famdoc_core::auth::{self, SESSION_COOKIE};

use super::Context;

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Open a session for an existing identity and print its token
    Create(CreateSessionArgs),

    /// Revoke a session token
    Revoke(RevokeSessionArgs),
}

#[derive(Args)]
pub struct CreateSessionArgs {
    /// Email of the identity
    pub email: String,

    /// Role claims to attach (repeatable), e.g. --role admin
    #[arg(long = "role")]
    pub roles: Vec<String>,
}

#[derive(Args)]
pub struct RevokeSessionArgs {
    pub token: String,
}

pub async fn execute(cmd: SessionCommands, ctx: &Context) -> Result<()> {
    let pool = ctx.pool().await?;

    match cmd {
        SessionCommands::Create(args) => {
            let identity = auth::find_identity_by_email(&pool, &args.email)
                .await?
                .ok_or_else(|| anyhow::anyhow!("No identity for {}", args.email))?;
            let session = auth::create_session(&pool, &identity.auth_id, args.roles).await?;

            println!("{} Session for {}", "✓".green().bold(), identity.email.cyan());
            println!("  {}  {}", "Token".bold(), session.token);
            println!("  {} {}={}", "Cookie".bold(), SESSION_COOKIE, session.token);
        }

        SessionCommands::Revoke(args) => {
            if auth::revoke_session(&pool, &args.token).await? {
                println!("{} Revoked", "✓".green().bold());
            } else {
                println!("{}", "No such session.".dimmed());
            }
        }
    }

    Ok(())
}
