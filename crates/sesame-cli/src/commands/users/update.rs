//! Update user command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use sesame_http::{NewUser, UserPatch};

use crate::commands::rejected;
use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// User id
    pub id: u64,

    /// Replace the whole record (PUT); requires --name, --username and --email
    #[arg(long)]
    pub replace: bool,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub website: Option<String>,
}

pub async fn run(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let users = ctx.users().await?;

    let result = if args.replace {
        let user = NewUser {
            name: args.name.context("--replace requires --name")?,
            username: args.username.context("--replace requires --username")?,
            email: args.email.context("--replace requires --email")?,
            phone: args.phone,
            website: args.website,
        };
        users.update(args.id, user).await
    } else {
        let patch = UserPatch {
            name: args.name,
            username: args.username,
            email: args.email,
            phone: args.phone,
            website: args.website,
        };
        users.patch(args.id, patch).await
    };

    let record = result.map_err(|errors| rejected(errors, "Failed to update user"))?;
    output::json(&record)
}
