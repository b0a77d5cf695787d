pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::types::UserId;

#[derive(Parser)]
#[command(name = "complex-api")]
#[command(about = "Complex API - residential complex management backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "JSON fixture of users and complexes upserted into the store at startup")]
    pub seed: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Print a signed bearer token for a user")]
    Token {
        #[arg(help = "User id (UUID) placed in the token subject")]
        user_id: UserId,
    },
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::handle(config, cli.seed).await,
        Commands::Token { user_id } => commands::token::handle(&config, user_id),
    }
}
