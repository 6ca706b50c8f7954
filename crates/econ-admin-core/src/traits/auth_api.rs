//! Remote authentication contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::Identity;
use crate::{AccessToken, Credentials, RefreshToken, Result};

/// Output of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub identity: Identity,
    /// Expiry reported by the backend, if it sent a usable one.
    pub expires_at: Option<DateTime<Utc>>,
}

/// The four remote operations of the backend authentication service.
///
/// Implementations perform exactly one remote call per method and never
/// retry. Every method that acts on an existing session is handed the token
/// explicitly.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /api/auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutput>;

    /// `POST /api/auth/logout`
    async fn logout(&self, token: &AccessToken) -> Result<()>;

    /// `GET /api/auth/me`
    async fn current_user(&self, token: &AccessToken) -> Result<Identity>;

    /// `GET /api/auth/validate`
    async fn validate(&self, token: &AccessToken) -> Result<bool>;
}
