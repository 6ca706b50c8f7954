//! Subcommand implementations.

pub mod get;
pub mod login;
mod logout;
pub mod navigate;
pub mod routes;
mod validate;
mod whoami;

use anyhow::Result;

use crate::cli::Commands;
use crate::context::AppContext;

pub async fn handle(cmd: Commands, ctx: &AppContext) -> Result<()> {
    match cmd {
        Commands::Login(args) => login::run(args, ctx).await,
        Commands::Logout => logout::run(ctx).await,
        Commands::Whoami => whoami::run(ctx).await,
        Commands::Validate => validate::run(ctx).await,
        Commands::Navigate(args) => navigate::run(args, ctx).await,
        Commands::Routes(args) => routes::run(args, ctx),
        Commands::Get(args) => get::run(args, ctx).await,
    }
}
