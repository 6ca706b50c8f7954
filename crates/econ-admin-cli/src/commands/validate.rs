//! Validate command implementation.

use anyhow::{Context, Result, bail};

use econ_admin_core::error::AuthError;

use crate::context::AppContext;
use crate::output;

pub async fn run(ctx: &AppContext) -> Result<()> {
    if ctx.auth.session().access_token().is_none() {
        return Err(AuthError::NotAuthenticated)
            .context("No active session. Run 'econ-admin login' first.");
    }

    if ctx.auth.validate_token().await {
        output::success("Token is valid");
        Ok(())
    } else {
        output::warning("Token was rejected by the backend");
        bail!("Token is not valid");
    }
}
