//! Users subcommand implementations.

mod create;
mod delete;
mod get;
mod list;
mod update;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::session::Context;

#[derive(Args, Debug)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersSubcommand {
    /// List users
    List(list::ListArgs),

    /// Fetch a single user
    Get(get::GetArgs),

    /// Create a user
    Create(create::CreateArgs),

    /// Update a user (partial unless --replace)
    Update(update::UpdateArgs),

    /// Delete a user
    Delete(delete::DeleteArgs),
}

pub async fn handle(cmd: UsersCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        UsersSubcommand::List(args) => list::run(args, ctx).await,
        UsersSubcommand::Get(args) => get::run(args, ctx).await,
        UsersSubcommand::Create(args) => create::run(args, ctx).await,
        UsersSubcommand::Update(args) => update::run(args, ctx).await,
        UsersSubcommand::Delete(args) => delete::run(args, ctx).await,
    }
}
