//! Whoami command implementation.

use anyhow::{Context, Result};

use econ_admin_core::error::AuthError;

use crate::context::AppContext;
use crate::output;

pub async fn run(ctx: &AppContext) -> Result<()> {
    ctx.auth.init().await;

    let identity = ctx
        .auth
        .session()
        .identity()
        .ok_or(AuthError::NotAuthenticated)
        .context("No active session. Run 'econ-admin login' first.")?;

    output::identity(&identity);
    output::field("Store", &ctx.store.path().display().to_string());

    Ok(())
}
