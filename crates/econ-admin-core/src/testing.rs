//! In-process backend double shared by the unit tests.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{Error, ProtocolError, TransportError};
use crate::traits::{AuthApi, LoginOutput};
use crate::types::{Identity, RoleSet};
use crate::{AccessToken, Credentials, RefreshToken, Result};

/// Accepts `alice/secret` (developer) and `admin/admin123` (admin, developer).
pub(crate) struct FakeAuthApi {
    pub token_valid: AtomicBool,
    pub validate_down: AtomicBool,
    pub me_rejects: AtomicBool,
    pub logout_down: AtomicBool,
    pub login_gate: Option<Notify>,
    pub logout_gate: Option<Notify>,
    calls: Mutex<Vec<&'static str>>,
}

impl Default for FakeAuthApi {
    fn default() -> Self {
        Self {
            token_valid: AtomicBool::new(true),
            validate_down: AtomicBool::new(false),
            me_rejects: AtomicBool::new(false),
            logout_down: AtomicBool::new(false),
            login_gate: None,
            logout_gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeAuthApi {
    pub fn gated() -> Self {
        Self {
            login_gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub fn gated_logout() -> Self {
        Self {
            logout_gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn roles_for(username: &str) -> Option<RoleSet> {
        match username {
            "alice" => Some(RoleSet::from_iter(["developer"])),
            "admin" => Some(RoleSet::from_iter(["admin", "developer"])),
            _ => None,
        }
    }

    fn unauthorized() -> Error {
        Error::Protocol(ProtocolError::new(
            401,
            Some("Invalid credentials".to_string()),
            None,
        ))
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutput> {
        self.record("login");
        if let Some(gate) = &self.login_gate {
            gate.notified().await;
        }

        let accepted = matches!(
            (credentials.username(), credentials.password()),
            ("alice", "secret") | ("admin", "admin123")
        );
        let roles = Self::roles_for(credentials.username()).filter(|_| accepted);
        let Some(roles) = roles else {
            return Err(Self::unauthorized());
        };

        Ok(LoginOutput {
            access_token: AccessToken::new(format!("simple-token-{}", credentials.username())),
            refresh_token: RefreshToken::new(format!("refresh-token-{}", credentials.username())),
            identity: Identity::new(credentials.username(), roles),
            expires_at: None,
        })
    }

    async fn logout(&self, _token: &AccessToken) -> Result<()> {
        self.record("logout");
        if let Some(gate) = &self.logout_gate {
            gate.notified().await;
        }
        if self.logout_down.load(Ordering::SeqCst) {
            return Err(Error::Transport(TransportError::Connection {
                message: "connection refused".to_string(),
            }));
        }
        Ok(())
    }

    async fn current_user(&self, token: &AccessToken) -> Result<Identity> {
        self.record("current_user");
        if self.me_rejects.load(Ordering::SeqCst) {
            return Err(Self::unauthorized());
        }
        let username = token
            .as_str()
            .strip_prefix("simple-token-")
            .ok_or_else(Self::unauthorized)?;
        let roles = Self::roles_for(username).ok_or_else(Self::unauthorized)?;
        Ok(Identity::new(username, roles))
    }

    async fn validate(&self, _token: &AccessToken) -> Result<bool> {
        self.record("validate");
        if self.validate_down.load(Ordering::SeqCst) {
            return Err(Error::Transport(TransportError::Timeout));
        }
        Ok(self.token_valid.load(Ordering::SeqCst))
    }
}

/// Log output collected from a thread-local subscriber.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route this thread's events here until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
