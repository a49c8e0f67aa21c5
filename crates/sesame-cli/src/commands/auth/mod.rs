//! Auth subcommand implementations.

mod forgot_password;
mod login;
mod logout;
mod refresh_token;
mod register;
mod status;
mod whoami;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::session::Context;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Sign in and store the session
    Login(login::LoginArgs),

    /// Create an account and store the session
    Register(register::RegisterArgs),

    /// Sign out and forget the stored session
    Logout(logout::LogoutArgs),

    /// Display the stored session
    Whoami(whoami::WhoamiArgs),

    /// Exchange the refresh token for new tokens
    RefreshToken(refresh_token::RefreshTokenArgs),

    /// Request a password reset
    ForgotPassword(forgot_password::ForgotPasswordArgs),

    /// Show the session phase and the route it leads to
    Status(status::StatusArgs),
}

pub async fn handle(cmd: AuthCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args, ctx).await,
        AuthSubcommand::Register(args) => register::run(args, ctx).await,
        AuthSubcommand::Logout(args) => logout::run(args, ctx).await,
        AuthSubcommand::Whoami(args) => whoami::run(args, ctx).await,
        AuthSubcommand::RefreshToken(args) => refresh_token::run(args, ctx).await,
        AuthSubcommand::ForgotPassword(args) => forgot_password::run(args, ctx).await,
        AuthSubcommand::Status(args) => status::run(args, ctx).await,
    }
}
