//! Logout command implementation.

use anyhow::Result;
use clap::Args;

use crate::commands::rejected;
use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs, ctx: &Context) -> Result<()> {
    let auth = ctx.auth()?;

    // The local session is gone even when the server call or the session
    // read failed.
    auth.logout()
        .await
        .map_err(|errors| rejected(errors, "Logged out locally, but logout did not complete"))?;

    output::success("Logged out");
    Ok(())
}
