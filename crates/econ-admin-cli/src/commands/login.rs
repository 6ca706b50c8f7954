//! Login command implementation.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use econ_admin_core::Credentials;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long, short)]
    pub username: String,

    /// Account password
    #[arg(long, short, env = "ECON_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, ctx: &AppContext) -> Result<()> {
    let credentials = Credentials::new(&args.username, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    if let Err(e) = ctx.auth.login(credentials).await {
        tracing::debug!(error = %e, "Login rejected");
        let message = ctx
            .auth
            .session()
            .last_error()
            .unwrap_or_else(|| e.user_message());
        bail!("{}", message);
    }

    let snapshot = ctx.auth.session().snapshot();
    output::success("Logged in successfully");
    println!();
    if let Some(identity) = &snapshot.identity {
        output::identity(identity);
    }
    if let Some(expires_at) = snapshot.expires_at {
        output::field("Expires", &expires_at.to_rfc3339());
    }

    Ok(())
}
