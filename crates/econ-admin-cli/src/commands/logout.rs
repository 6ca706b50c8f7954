//! Logout command implementation.

use anyhow::Result;

use crate::context::AppContext;
use crate::output;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let had_session = ctx.auth.session().access_token().is_some();

    // Always clears the store, even one that could not be read back.
    ctx.auth.logout().await;

    if had_session {
        output::success("Logged out");
    } else {
        output::success("Not logged in; stored session cleared");
    }
    Ok(())
}
