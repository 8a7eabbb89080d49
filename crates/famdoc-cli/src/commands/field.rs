//! Data field commands.

use anyhow::Result;
use clap::Subcommand;
use famdoc_core::data_field;

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum FieldCommands {
    /// List all data fields
    List,
}

pub async fn execute(cmd: FieldCommands, ctx: &Context) -> Result<()> {
    let pool = ctx.pool().await?;

    match cmd {
        FieldCommands::List => {
            let fields = data_field::list_data_fields(&pool).await?;
            output::print_fields_table(&fields, ctx.verbose);
        }
    }

    Ok(())
}
