//! The auth service: the only writer of session state.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::error::AuthError;
use crate::session::{SessionState, Ticket};
use crate::traits::AuthApi;
use crate::types::Identity;
use crate::{Credentials, Result};

/// Lowers `loading` when a login finishes, however it finishes.
struct LoadingGuard<'a> {
    session: &'a SessionState,
    ticket: Ticket,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.session.end_loading(self.ticket);
    }
}

/// Drives the session lifecycle against the backend.
///
/// One instance per process, shared by `Arc` with the interceptor and the
/// route guard.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use econ_admin_core::{AuthApi, AuthService, Credentials, MemoryCredentialStore, SessionState};
///
/// # async fn example(api: Arc<dyn AuthApi>) -> Result<(), econ_admin_core::Error> {
/// let session = Arc::new(SessionState::hydrated(Arc::new(MemoryCredentialStore::new())));
/// let auth = AuthService::new(api, session);
///
/// auth.init().await;
/// let identity = auth.login(Credentials::new("alice", "secret")).await?;
/// println!("logged in as {}", identity.username);
/// # Ok(())
/// # }
/// ```
pub struct AuthService {
    api: Arc<dyn AuthApi>,
    session: Arc<SessionState>,
}

impl AuthService {
    pub fn new(api: Arc<dyn AuthApi>, session: Arc<SessionState>) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Log in and replace the current session.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (also recorded as the session's
    /// `last_error`), a storage error if the tokens could not be persisted,
    /// or [`AuthError::Superseded`] if a later login or logout started before
    /// this one resolved. On error the prior session is left as it was.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: Credentials) -> Result<Identity> {
        let ticket = self.session.begin_login();
        let _loading = LoadingGuard {
            session: &self.session,
            ticket,
        };

        let result = match self.api.login(&credentials).await {
            Ok(output) => {
                let identity = output.identity.clone();
                self.session
                    .commit_login(ticket, output)
                    .map(|committed| committed.then_some(identity))
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(Some(identity)) => {
                info!(roles = %identity.roles, "Login successful");
                Ok(identity)
            }
            Ok(None) => {
                debug!("Login resolved after a newer session action, discarding");
                Err(AuthError::Superseded.into())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.session.record_login_error(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// End the session locally, telling the backend if there is a token.
    ///
    /// A failed logout request is logged and ignored. Safe to call with no
    /// active session. The local clear is skipped only when a login that
    /// started during the remote call has already installed a new session.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let ticket = self.session.begin();

        if let Some(token) = self.session.access_token() {
            if let Err(e) = self.api.logout(&token).await {
                warn!(error = %e, "Logout request failed");
            }
        }

        if self.session.commit_logout(ticket) {
            info!("Logged out");
        } else {
            debug!("Logout superseded by a newer login");
        }
    }

    /// Refresh the identity behind the current token.
    ///
    /// Does nothing without a token. If the backend refuses, the session is
    /// dropped via [`logout`](Self::logout) and `None` is returned.
    #[instrument(skip(self))]
    pub async fn fetch_current_user(&self) -> Option<Identity> {
        let token = self.session.access_token()?;
        let ticket = self.session.begin();

        match self.api.current_user(&token).await {
            Ok(identity) => {
                if self.session.commit_identity(ticket, identity.clone()) {
                    debug!(username = %identity.username, "Identity confirmed");
                    Some(identity)
                } else {
                    debug!("Identity fetch superseded by a newer session action");
                    None
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to get current user");
                if self.session.is_current(ticket) {
                    self.logout().await;
                }
                None
            }
        }
    }

    /// Ask the backend whether the current token is still good.
    ///
    /// False without a token or when the check itself fails.
    #[instrument(skip(self))]
    pub async fn validate_token(&self) -> bool {
        let Some(token) = self.session.access_token() else {
            return false;
        };

        match self.api.validate(&token).await {
            Ok(valid) => valid,
            Err(e) => {
                error!(error = %e, "Token validation failed");
                false
            }
        }
    }

    /// Reconcile a restored token with the backend before anything trusts it.
    #[instrument(skip(self))]
    pub async fn init(&self) {
        if self.session.access_token().is_none() {
            return;
        }

        if self.validate_token().await {
            self.fetch_current_user().await;
        } else {
            info!("Persisted token rejected, dropping session");
            self.logout().await;
        }
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
