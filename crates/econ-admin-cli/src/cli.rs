//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::{get, login, navigate, routes};

/// Command-line client for the economy admin backend.
#[derive(Parser, Debug)]
#[command(name = "econ-admin")]
#[command(author, version = env!("ECON_ADMIN_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the backend and the local session live.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Backend base URL
    #[arg(
        long,
        env = "ECON_ADMIN_API_URL",
        default_value = "http://localhost:8080",
        global = true
    )]
    pub api_url: String,

    /// Directory holding the stored session (defaults to the platform data directory)
    #[arg(long, env = "ECON_ADMIN_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Route table JSON file (defaults to the built-in admin routes)
    #[arg(long, env = "ECON_ADMIN_ROUTES", global = true)]
    pub routes: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login(login::LoginArgs),

    /// End the session, locally and on the backend
    Logout,

    /// Show who the stored session belongs to
    Whoami,

    /// Ask the backend whether the stored token is still accepted
    Validate,

    /// Run the route guard for a page and show where it lands
    Navigate(navigate::NavigateArgs),

    /// List the route table
    Routes(routes::RoutesArgs),

    /// Send an authenticated GET to the backend and print the JSON body
    Get(get::GetArgs),
}
