//! API server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use famdoc_web::state::AppState;
use std::path::PathBuf;
use tracing::warn;

use super::Context;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "FAMDOC_PORT")]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "FAMDOC_HOST")]
    pub host: Option<String>,

    /// Public URL of the web application, used in invitation links
    #[arg(long, env = "APP_URL")]
    pub app_url: Option<String>,

    /// Keep all data in memory instead of Redis
    #[arg(long)]
    pub in_memory: bool,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path, used with --log
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, ctx: Context) -> Result<()> {
    let mut settings = ctx.settings;
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(app_url) = args.app_url {
        settings.app_url = app_url;
    }

    let db = if args.in_memory {
        warn!("running on the in-memory store, data is lost on exit");
        famdoc_db::in_memory()
    } else {
        famdoc_db::init_pool(&settings.redis_url).await?
    };

    println!();
    println!("  {} {}", "famdoc".cyan().bold(), "API Server".bold());
    println!();
    println!("  {}       http://{}:{}/api", "API".green(), settings.host, settings.port);
    println!(
        "  {}     {}",
        "Store".green(),
        if args.in_memory { "in-memory".to_string() } else { settings.redis_url.clone() }
    );
    println!("  {}  {}", "App URL".green(), settings.app_url);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    let state = AppState::new(db, settings.app_url.clone());
    famdoc_web::run_server(state, &settings.host, settings.port).await?;

    Ok(())
}
