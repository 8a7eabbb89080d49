//! Survey export commands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use famdoc_core::survey::{
    self,
    tabulate::{export_filename, tabulate},
};
use std::path::PathBuf;

use super::{acting_user, Context};
use crate::output;

#[derive(Subcommand)]
pub enum SurveyCommands {
    /// List surveys
    List,

    /// Write a survey's response table as CSV
    Export(ExportArgs),
}

#[derive(Args)]
pub struct ExportArgs {
    /// Survey ID
    pub survey_id: String,

    /// Output directory (defaults to the project directory)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Export only the rows this user may see
    #[arg(long = "as")]
    pub as_user: Option<String>,
}

pub async fn execute(cmd: SurveyCommands, ctx: &Context) -> Result<()> {
    let pool = ctx.pool().await?;

    match cmd {
        SurveyCommands::List => {
            let surveys = survey::list_surveys(&pool).await?;
            output::print_surveys_table(&surveys);
        }

        SurveyCommands::Export(args) => {
            let found = survey::get_survey(&pool, &args.survey_id).await?;
            let actor = acting_user(&pool, args.as_user.as_deref()).await?;
            let fields = survey::survey_fields(&pool, &found).await?;
            let responses = survey::list_responses(&pool, &actor, &found.id).await?;
            let table = tabulate(&fields, &responses);

            let dir = args.out.unwrap_or_else(|| ctx.project_dir.clone());
            std::fs::create_dir_all(&dir)?;
            let path = dir.join(export_filename(&found.name, chrono::Local::now().naive_local()));
            std::fs::write(&path, table.to_csv()?)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            println!(
                "{} Exported {} row(s) to {}",
                "✓".green().bold(),
                table.rows.len(),
                path.display().to_string().cyan()
            );
        }
    }

    Ok(())
}
