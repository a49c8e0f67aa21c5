//! List users command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ListArgs, ctx: &Context) -> Result<()> {
    let users = ctx.users().await?;
    let records = users.list().await.context("Failed to list users")?;

    if records.is_empty() {
        eprintln!("{}", "No users found.".dimmed());
        return Ok(());
    }

    for record in &records {
        if args.pretty {
            output::json_pretty(record)?;
        } else {
            output::json(record)?;
        }
    }

    Ok(())
}
