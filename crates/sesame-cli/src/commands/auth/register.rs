//! Register command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use sesame_core::Registration;

use crate::commands::rejected;
use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Password confirmation (defaults to --password)
    #[arg(long)]
    pub confirm_password: Option<String>,
}

pub async fn run(args: RegisterArgs, ctx: &Context) -> Result<()> {
    let auth = ctx.auth()?;

    let mut registration = Registration::new(args.name, args.email, args.password);
    if let Some(confirmation) = args.confirm_password {
        registration = registration.with_confirmation(confirmation);
    }

    eprintln!("{}", "Creating account...".dimmed());

    let user = auth
        .register(registration)
        .await
        .map_err(|errors| rejected(errors, "Failed to register"))?;

    output::success("Account created");
    println!();
    output::field("ID", &user.id);
    output::field("Name", &user.name);
    output::field("Email", &user.email);

    Ok(())
}
