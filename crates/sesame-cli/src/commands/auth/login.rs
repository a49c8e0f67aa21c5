//! Login command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use sesame_core::Credentials;

use crate::commands::rejected;
use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: LoginArgs, ctx: &Context) -> Result<()> {
    let auth = ctx.auth()?;

    eprintln!("{}", "Logging in...".dimmed());

    let user = auth
        .login(Credentials::new(args.email, args.password))
        .await
        .map_err(|errors| rejected(errors, "Failed to login"))?;

    println!();
    output::field("ID", &user.id);
    output::field("Name", &user.name);
    output::field("Email", &user.email);

    Ok(())
}
