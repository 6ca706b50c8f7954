//! In-memory session state, kept in step with the credential store.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::traits::{CredentialStore, LoginOutput, StoredCredentials};
use crate::types::Identity;
use crate::{AccessToken, RefreshToken, Result};

/// Sequence number taken by a state-mutating action when it starts.
///
/// Logins and identity fetches commit only while their ticket is the latest
/// one issued. A logout always clears unless a login that started after it
/// has already installed a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// A consistent copy of the session at one instant.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub access_token: Option<AccessToken>,
    pub refresh_token: Option<RefreshToken>,
    pub identity: Option<Identity>,
    pub expires_at: Option<DateTime<Utc>>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl SessionSnapshot {
    /// Token and identity are both present.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.identity.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.identity.as_ref().is_some_and(Identity::is_admin)
    }

    pub fn is_developer(&self) -> bool {
        self.identity.as_ref().is_some_and(Identity::is_developer)
    }

    pub fn can_manage_system(&self) -> bool {
        self.identity.as_ref().is_some_and(Identity::can_manage_system)
    }

    pub fn can_edit_content(&self) -> bool {
        self.identity.as_ref().is_some_and(Identity::can_edit_content)
    }

    /// A token was restored but the backend has not confirmed who it belongs to.
    pub fn needs_init(&self) -> bool {
        self.access_token.is_some() && self.identity.is_none()
    }
}

#[derive(Default)]
struct SessionInner {
    access_token: Option<AccessToken>,
    refresh_token: Option<RefreshToken>,
    identity: Option<Identity>,
    expires_at: Option<DateTime<Utc>>,
    loading: Option<Ticket>,
    last_error: Option<String>,
    latest: u64,
    /// Ticket of the last login that installed a session.
    installed: u64,
}

impl SessionInner {
    fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    fn clear(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.identity = None;
        self.expires_at = None;
    }
}

/// The session of this process.
///
/// Constructed once at startup and shared by `Arc` between the auth service,
/// the interceptor and the route guard. Everyone may read; only
/// [`AuthService`](crate::AuthService) mutates.
pub struct SessionState {
    inner: RwLock<SessionInner>,
    store: Arc<dyn CredentialStore>,
}

impl SessionState {
    /// Create the session, restoring any token pair a prior run left in `store`.
    ///
    /// An unreadable store is logged and treated as empty.
    pub fn hydrated(store: Arc<dyn CredentialStore>) -> Self {
        let mut inner = SessionInner::default();

        match store.load() {
            Ok(Some(stored)) => {
                debug!("Restored persisted session token");
                inner.access_token = Some(stored.access_token);
                inner.refresh_token = stored.refresh_token;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read credential store, starting logged out"),
        }

        Self {
            inner: RwLock::new(inner),
            store,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.read();
        SessionSnapshot {
            access_token: inner.access_token.clone(),
            refresh_token: inner.refresh_token.clone(),
            identity: inner.identity.clone(),
            expires_at: inner.expires_at,
            loading: inner.loading.is_some(),
            last_error: inner.last_error.clone(),
        }
    }

    /// The current access token, read fresh.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.read().access_token.clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read().identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        let inner = self.read();
        inner.access_token.is_some() && inner.identity.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading.is_some()
    }

    pub fn last_error(&self) -> Option<String> {
        self.read().last_error.clone()
    }

    pub(crate) fn begin(&self) -> Ticket {
        self.write().issue()
    }

    /// Start a login: issue a ticket, raise `loading`, clear `last_error`.
    pub(crate) fn begin_login(&self) -> Ticket {
        let mut inner = self.write();
        let ticket = inner.issue();
        inner.loading = Some(ticket);
        inner.last_error = None;
        ticket
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        self.read().is_current(ticket)
    }

    /// Lower `loading` if this login is the one that raised it.
    pub(crate) fn end_loading(&self, ticket: Ticket) {
        let mut inner = self.write();
        if inner.loading == Some(ticket) {
            inner.loading = None;
        }
    }

    pub(crate) fn record_login_error(&self, ticket: Ticket, message: String) {
        let mut inner = self.write();
        if inner.is_current(ticket) {
            inner.last_error = Some(message);
        }
    }

    /// Install a fresh session. Returns `Ok(false)` if the ticket is stale.
    ///
    /// The store is written first; if that fails, memory is left untouched.
    pub(crate) fn commit_login(&self, ticket: Ticket, output: LoginOutput) -> Result<bool> {
        let mut inner = self.write();
        if !inner.is_current(ticket) {
            return Ok(false);
        }

        self.store.save(&StoredCredentials {
            access_token: output.access_token.clone(),
            refresh_token: Some(output.refresh_token.clone()),
        })?;

        inner.access_token = Some(output.access_token);
        inner.refresh_token = Some(output.refresh_token);
        inner.identity = Some(output.identity);
        inner.expires_at = output.expires_at;
        inner.installed = ticket.0;
        Ok(true)
    }

    /// Replace the identity of the current token. Returns false if stale or
    /// if the token is gone.
    pub(crate) fn commit_identity(&self, ticket: Ticket, identity: Identity) -> bool {
        let mut inner = self.write();
        if !inner.is_current(ticket) || inner.access_token.is_none() {
            return false;
        }
        inner.identity = Some(identity);
        true
    }

    /// Drop tokens and identity from memory and store.
    ///
    /// Returns false, leaving state alone, only if a login issued after
    /// `ticket` has already installed a session. Actions that started later
    /// but committed nothing do not hold the logout back.
    pub(crate) fn commit_logout(&self, ticket: Ticket) -> bool {
        let mut inner = self.write();
        if inner.installed > ticket.0 {
            return false;
        }
        inner.clear();
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear credential store");
        }
        true
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("SessionState")
            .field("identity", &inner.identity)
            .field("tokens", &"[REDACTED]")
            .field("loading", &inner.loading.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MemoryCredentialStore;
    use crate::types::RoleSet;

    fn output(token: &str, roles: &[&str]) -> LoginOutput {
        LoginOutput {
            access_token: AccessToken::new(token),
            refresh_token: RefreshToken::new(format!("refresh-{token}")),
            identity: Identity::new("alice", RoleSet::from_iter(roles.iter().copied())),
            expires_at: None,
        }
    }

    #[test]
    fn starts_empty_without_persisted_token() {
        let session = SessionState::hydrated(Arc::new(MemoryCredentialStore::new()));
        let snap = session.snapshot();
        assert!(snap.access_token.is_none());
        assert!(!snap.is_authenticated());
        assert!(!snap.needs_init());
    }

    #[test]
    fn hydrates_token_without_identity() {
        let store = MemoryCredentialStore::with_credentials(StoredCredentials {
            access_token: AccessToken::new("persisted"),
            refresh_token: Some(RefreshToken::new("persisted-refresh")),
        });
        let session = SessionState::hydrated(Arc::new(store));
        let snap = session.snapshot();
        assert_eq!(snap.access_token, Some(AccessToken::new("persisted")));
        assert!(snap.identity.is_none());
        assert!(snap.needs_init());
        assert!(!snap.is_authenticated());
    }

    #[test]
    fn commit_login_writes_store_and_memory() {
        let store = Arc::new(MemoryCredentialStore::new());
        let session = SessionState::hydrated(store.clone());

        let ticket = session.begin_login();
        assert!(session.is_loading());
        assert!(session.commit_login(ticket, output("t1", &["developer"])).unwrap());
        session.end_loading(ticket);

        let stored = store.load().unwrap().unwrap();
        assert_eq!(Some(stored.access_token), session.access_token());
        assert!(session.is_authenticated());
        assert!(!session.is_loading());
    }

    #[test]
    fn stale_login_is_discarded() {
        let session = SessionState::hydrated(Arc::new(MemoryCredentialStore::new()));

        let login = session.begin_login();
        let logout = session.begin();
        assert!(session.commit_logout(logout));
        assert!(!session.commit_login(login, output("late", &["admin"])).unwrap());
        session.end_loading(login);

        assert!(session.access_token().is_none());
        assert!(!session.is_loading());
    }

    #[test]
    fn logout_clears_despite_later_uncommitted_actions() {
        let store = Arc::new(MemoryCredentialStore::new());
        let session = SessionState::hydrated(store.clone());
        let first = session.begin_login();
        session.commit_login(first, output("old", &["admin"])).unwrap();

        let logout = session.begin();
        let failed_login = session.begin_login();
        session.record_login_error(failed_login, "Invalid credentials".to_string());
        session.end_loading(failed_login);
        let _fetch = session.begin();

        assert!(session.commit_logout(logout));
        assert!(session.access_token().is_none());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn logout_yields_to_a_newer_installed_login() {
        let session = SessionState::hydrated(Arc::new(MemoryCredentialStore::new()));

        let logout = session.begin();
        let login = session.begin_login();
        assert!(session.commit_login(login, output("fresh", &["developer"])).unwrap());

        assert!(!session.commit_logout(logout));
        assert_eq!(session.access_token(), Some(AccessToken::new("fresh")));
    }

    #[test]
    fn superseded_login_keeps_newer_loading_flag() {
        let session = SessionState::hydrated(Arc::new(MemoryCredentialStore::new()));

        let first = session.begin_login();
        let second = session.begin_login();
        session.end_loading(first);
        assert!(session.is_loading());
        session.end_loading(second);
        assert!(!session.is_loading());
    }

    #[test]
    fn identity_not_committed_without_token() {
        let session = SessionState::hydrated(Arc::new(MemoryCredentialStore::new()));
        let ticket = session.begin();
        assert!(!session.commit_identity(ticket, Identity::new("ghost", RoleSet::new())));
        assert!(session.identity().is_none());
    }

    #[test]
    fn begin_login_clears_previous_error() {
        let session = SessionState::hydrated(Arc::new(MemoryCredentialStore::new()));
        let ticket = session.begin_login();
        session.record_login_error(ticket, "Invalid credentials".to_string());
        assert_eq!(session.last_error().as_deref(), Some("Invalid credentials"));

        session.begin_login();
        assert!(session.last_error().is_none());
    }
}
