//! Refresh token command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::commands::rejected;
use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(_args: RefreshTokenArgs, ctx: &Context) -> Result<()> {
    let auth = ctx.auth()?;

    eprintln!("{}", "Refreshing session...".dimmed());

    let user = auth
        .refresh_session()
        .await
        .map_err(|errors| rejected(errors, "Failed to refresh session"))?;

    output::success("Session refreshed successfully");
    output::field("ID", &user.id);

    Ok(())
}
