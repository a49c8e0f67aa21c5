//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::users::UsersCommand;

/// Session toolkit CLI.
#[derive(Parser, Debug)]
#[command(name = "sesame")]
#[command(author, version = env!("SESAME_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL
    #[arg(long, env = "SESAME_API_BASE", global = true)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authentication and session operations
    Auth(AuthCommand),

    /// Directory operations on the users collection
    Users(UsersCommand),
}
