//! Delete user command implementation.

use anyhow::Result;
use clap::Args;

use crate::commands::rejected;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// User id
    pub id: u64,
}

pub async fn run(args: DeleteArgs, ctx: &Context) -> Result<()> {
    let users = ctx.users().await?;

    users
        .delete(args.id)
        .await
        .map_err(|errors| rejected(errors, "Failed to delete user"))
}
