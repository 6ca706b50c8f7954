//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use econ_admin_core::Identity;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning that does not fail the command.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print who a session belongs to and what it may do.
pub fn identity(identity: &Identity) {
    field("Username", &identity.username);
    field("Roles", &identity.roles.to_string());
    field("Admin", yes_no(identity.can_manage_system()));
    field("Editor", yes_no(identity.can_edit_content()));
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
