//! econ-admin-store - File-backed credential store.

mod store;

pub use store::{CREDENTIALS_FILE, FileCredentialStore};
