//! Seams between the session core and its collaborators.

mod auth_api;
mod credential_store;

pub use auth_api::{AuthApi, LoginOutput};
pub use credential_store::{CredentialStore, MemoryCredentialStore, StoredCredentials};
