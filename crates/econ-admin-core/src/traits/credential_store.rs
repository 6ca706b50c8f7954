//! Persistent credential storage.

use std::sync::Mutex;

use crate::{AccessToken, RefreshToken, Result};

/// The token pair as persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub access_token: AccessToken,
    pub refresh_token: Option<RefreshToken>,
}

/// Durable storage for the token pair.
///
/// Both tokens are written and cleared in one call so the store never holds
/// half a session. Methods are synchronous: callers invoke them while holding
/// the session lock so memory and store change together.
pub trait CredentialStore: Send + Sync {
    /// Load the persisted pair, if any.
    fn load(&self) -> Result<Option<StoredCredentials>>;

    /// Replace the persisted pair.
    fn save(&self, credentials: &StoredCredentials) -> Result<()>;

    /// Remove the persisted pair. Clearing an empty store succeeds.
    fn clear(&self) -> Result<()>;
}

/// A process-local store, for tests and embedders that do not persist.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<StoredCredentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a pair, as if left by a prior run.
    pub fn with_credentials(credentials: StoredCredentials) -> Self {
        Self {
            slot: Mutex::new(Some(credentials)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<StoredCredentials>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<StoredCredentials>> {
        Ok(self.slot().clone())
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        *self.slot() = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}
