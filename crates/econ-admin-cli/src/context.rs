//! Wiring of the store, backend client, session and guard for one run.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use econ_admin_core::{ApiUrl, AuthService, Navigator, RouteGuard, RouteTable, SessionState};
use econ_admin_http::{ApiClient, HttpAuthApi, HttpClient};
use econ_admin_store::FileCredentialStore;

use crate::cli::GlobalArgs;

/// Everything a command needs, built once per process.
pub struct AppContext {
    pub auth: Arc<AuthService>,
    pub api: ApiClient,
    pub navigator: Navigator,
    pub store: FileCredentialStore,
}

impl AppContext {
    pub fn build(args: &GlobalArgs) -> Result<Self> {
        let api_url = ApiUrl::new(&args.api_url).context("Invalid API URL")?;
        let store = FileCredentialStore::new(data_dir(args)?);
        tracing::debug!(api = %api_url, store = %store.path().display(), "Building context");

        let client = HttpClient::new(api_url).context("Failed to build HTTP client")?;
        let session = Arc::new(SessionState::hydrated(Arc::new(store.clone())));
        let auth = Arc::new(AuthService::new(
            Arc::new(HttpAuthApi::from_client(client.clone())),
            session,
        ));

        let table = route_table(args)?;
        let navigator = Navigator::new(table, RouteGuard::new(auth.clone()));

        Ok(Self {
            api: ApiClient::new(client, auth.clone()),
            auth,
            navigator,
            store,
        })
    }
}

fn data_dir(args: &GlobalArgs) -> Result<PathBuf> {
    match &args.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => {
            let dirs = ProjectDirs::from("", "", "econ-admin")
                .context("Could not determine data directory")?;
            Ok(dirs.data_dir().to_path_buf())
        }
    }
}

fn route_table(args: &GlobalArgs) -> Result<RouteTable> {
    match &args.routes {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read route table {}", path.display()))?;
            RouteTable::from_json(&json).context("Invalid route table")
        }
        None => Ok(RouteTable::admin()),
    }
}
