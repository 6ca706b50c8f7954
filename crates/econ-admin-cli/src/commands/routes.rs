//! Routes command implementation.

use anyhow::Result;
use clap::Args;

use econ_admin_core::RouteRequirements;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct RoutesArgs {
    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RoutesArgs, ctx: &AppContext) -> Result<()> {
    let table = ctx.navigator.table();

    if args.json {
        return output::json_pretty(&table.routes());
    }

    output::field("Base", table.base());
    for route in table.routes() {
        println!("{:<12} {:<12} {}", route.name, route.path, describe(&route.meta));
    }

    Ok(())
}

fn describe(meta: &RouteRequirements) -> String {
    let mut parts = Vec::new();
    if meta.requires_auth {
        parts.push("auth".to_string());
    }
    if meta.requires_guest {
        parts.push("guest".to_string());
    }
    if let Some(roles) = &meta.requires_role {
        parts.push(format!("roles {}", roles));
    }
    if parts.is_empty() {
        "public".to_string()
    } else {
        parts.join(", ")
    }
}
