//! CLI command definitions and handlers.

use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use famdoc_core::settings::Settings;
use famdoc_core::user::{
    self,
    model::{Role, User},
};
use famdoc_db::DbPool;
use std::path::PathBuf;

pub mod family;
pub mod field;
pub mod org;
pub mod serve;
pub mod session;
pub mod survey;
pub mod users;

/// famdoc - family case documentation
#[derive(Parser)]
#[command(name = "famdoc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Settings file (defaults to famdoc.toml in the project directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Redis connection URL
    #[arg(long, global = true, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve(serve::ServeArgs),

    /// Family lookups
    #[command(subcommand)]
    Family(family::FamilyCommands),

    /// Survey exports
    #[command(subcommand)]
    Survey(survey::SurveyCommands),

    /// Data field registry
    #[command(subcommand)]
    Field(field::FieldCommands),

    /// User administration
    #[command(subcommand)]
    User(users::UserCommands),

    /// Organizations
    #[command(subcommand)]
    Org(org::OrgCommands),

    /// Session tokens for local development
    #[command(subcommand)]
    Session(session::SessionCommands),
}

/// Resolved settings and paths shared by all commands.
pub struct Context {
    pub project_dir: PathBuf,
    pub settings: Settings,
    pub verbose: bool,
}

impl Context {
    /// Connect to the configured Redis store.
    pub async fn pool(&self) -> Result<DbPool> {
        famdoc_db::init_pool(&self.settings.redis_url)
            .await
            .with_context(|| format!("Failed to connect to {}", self.settings.redis_url))
    }
}

impl Cli {
    /// Load settings, then apply global overrides.
    pub fn context(&self) -> Result<Context> {
        let project_dir = match &self.project {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let mut settings = Settings::discover(self.config.as_deref(), &project_dir)
            .context("Failed to load settings")?;
        if let Some(url) = &self.redis_url {
            settings.redis_url = url.clone();
        }
        Ok(Context {
            project_dir,
            settings,
            verbose: self.verbose,
        })
    }

    pub async fn execute(self, ctx: Context) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args, ctx).await,
            Commands::Family(cmd) => family::execute(cmd, &ctx).await,
            Commands::Survey(cmd) => survey::execute(cmd, &ctx).await,
            Commands::Field(cmd) => field::execute(cmd, &ctx).await,
            Commands::User(cmd) => users::execute(cmd, &ctx).await,
            Commands::Org(cmd) => org::execute(cmd, &ctx).await,
            Commands::Session(cmd) => session::execute(cmd, &ctx).await,
        }
    }
}

/// The user a maintenance command acts as: the user behind `email`, or an
/// unrestricted operator when none is given.
pub async fn acting_user(pool: &DbPool, email: Option<&str>) -> Result<User> {
    let Some(email) = email else {
        return Ok(User {
            id: "cli".to_string(),
            auth_id: "cli".to_string(),
            email: "cli@localhost".to_string(),
            name: Some("famdoc CLI".to_string()),
            role: Role::Admin,
            organization_id: None,
            organization: None,
            created_at: Utc::now(),
        });
    };
    let identity = famdoc_core::auth::find_identity_by_email(pool, email)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No identity for {}", email))?;
    user::find_user_by_auth_id(pool, &identity.auth_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("{} has no user record", email))
}
