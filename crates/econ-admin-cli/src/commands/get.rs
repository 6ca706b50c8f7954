//! Get command implementation.

use anyhow::{Result, bail};
use clap::Args;
use serde_json::Value;

use econ_admin_core::Error;
use econ_admin_core::error::AuthError;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Backend path (e.g. /api/skills)
    pub path: String,
}

pub async fn run(args: GetArgs, ctx: &AppContext) -> Result<()> {
    match ctx.api.get::<Value>(&args.path).await {
        Ok(body) => output::json_pretty(&body),
        Err(Error::Auth(AuthError::SessionInvalidated)) => {
            bail!("Session expired and was cleared. Run 'econ-admin login' again.")
        }
        Err(e) => Err(e.into()),
    }
}
