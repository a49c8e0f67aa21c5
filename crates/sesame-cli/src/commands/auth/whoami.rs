//! Whoami command implementation.

use anyhow::{Context as _, Result};
use chrono::Local;
use clap::Args;

use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs, ctx: &Context) -> Result<()> {
    let stored = ctx
        .store
        .load_stored()
        .context("Failed to load session")?
        .context("No active session. Run 'sesame auth login' first.")?;

    output::field("ID", &stored.user.id);
    output::field("Name", &stored.user.name);
    output::field("Email", &stored.user.email);
    output::field("API", ctx.env.api_base.as_str());
    output::field(
        "Since",
        &stored
            .saved_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    );

    Ok(())
}
