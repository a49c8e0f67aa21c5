//! Create user command implementation.

use anyhow::Result;
use clap::Args;

use sesame_http::NewUser;

use crate::commands::rejected;
use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub website: Option<String>,
}

pub async fn run(args: CreateArgs, ctx: &Context) -> Result<()> {
    let users = ctx.users().await?;

    let record = users
        .create(NewUser {
            name: args.name,
            username: args.username,
            email: args.email,
            phone: args.phone,
            website: args.website,
        })
        .await
        .map_err(|errors| rejected(errors, "Failed to create user"))?;

    output::json(&record)
}
