//! Navigate command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct NavigateArgs {
    /// Page path, with or without the base (e.g. /skills or /admin/skills)
    pub path: String,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: NavigateArgs, ctx: &AppContext) -> Result<()> {
    let outcome = ctx
        .navigator
        .navigate(&args.path)
        .await
        .context("Navigation failed")?;

    if args.json {
        return output::json_pretty(&json!({
            "route": outcome.route,
            "hops": outcome.hops,
        }));
    }

    output::field("Route", &outcome.route.name);
    output::field("Path", &outcome.route.path);
    if outcome.was_redirected() {
        output::field("Redirects", &outcome.hops.join(" -> "));
    }

    Ok(())
}
