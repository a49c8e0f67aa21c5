//! Get user command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// User id
    pub id: u64,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: GetArgs, ctx: &Context) -> Result<()> {
    let users = ctx.users().await?;
    let record = users
        .get(args.id)
        .await
        .with_context(|| format!("Failed to fetch user {}", args.id))?;

    if args.pretty {
        output::json_pretty(&record)
    } else {
        output::json(&record)
    }
}
