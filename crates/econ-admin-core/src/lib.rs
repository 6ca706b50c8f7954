//! econ-admin-core - Session lifecycle for the economy admin client.
//!
//! A process owns one [`SessionState`], hydrated from a
//! [`CredentialStore`] at startup. The [`AuthService`] is its only writer:
//! it logs in and out, confirms restored tokens and refreshes the identity,
//! talking to the backend through an [`AuthApi`]. The [`RouteGuard`] reads
//! the session before every navigation.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use econ_admin_core::{
//!     AuthApi, AuthService, Credentials, MemoryCredentialStore, Navigator, RouteGuard,
//!     RouteTable, SessionState,
//! };
//!
//! # async fn example(api: Arc<dyn AuthApi>) -> Result<(), econ_admin_core::Error> {
//! let session = Arc::new(SessionState::hydrated(Arc::new(MemoryCredentialStore::new())));
//! let auth = Arc::new(AuthService::new(api, session));
//! let navigator = Navigator::new(RouteTable::admin(), RouteGuard::new(auth.clone()));
//!
//! auth.login(Credentials::new("alice", "secret")).await?;
//! let outcome = navigator.navigate("/skills").await?;
//! println!("landed on {}", outcome.route.name);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod credentials;
pub mod error;
pub mod guard;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

#[cfg(test)]
mod testing;

pub use auth::AuthService;
pub use credentials::Credentials;
pub use error::Error;
pub use guard::{
    LANDING_PATH, LOGIN_PATH, Navigation, NavigationOutcome, Navigator, RedirectReason, Route,
    RouteGuard, RouteRequirements, RouteTable,
};
pub use session::{SessionSnapshot, SessionState};
pub use tokens::{AccessToken, RefreshToken};
pub use traits::{AuthApi, CredentialStore, LoginOutput, MemoryCredentialStore, StoredCredentials};
pub use types::{ApiUrl, Identity, RoleSet};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
