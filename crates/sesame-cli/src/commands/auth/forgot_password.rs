//! Forgot password command implementation.

use anyhow::{Result, bail};
use clap::Args;

use crate::commands::rejected;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct ForgotPasswordArgs {
    /// Account username or email
    pub username: String,
}

pub async fn run(args: ForgotPasswordArgs, ctx: &Context) -> Result<()> {
    let auth = ctx.auth()?;

    let accepted = auth
        .forgot_password(&args.username)
        .await
        .map_err(|errors| rejected(errors, "Failed to request password reset"))?;

    if !accepted {
        bail!("The server refused the password reset request");
    }

    Ok(())
}
