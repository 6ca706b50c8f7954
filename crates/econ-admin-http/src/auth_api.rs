//! HTTP implementation of the auth contract.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use tracing::{debug, instrument};

use econ_admin_core::{
    AccessToken, ApiUrl, AuthApi, Credentials, Identity, LoginOutput, RefreshToken, Result,
};

use crate::client::HttpClient;
use crate::endpoints::*;

/// Values above this are absolute epoch milliseconds, below it a lifetime in seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Interpret the login response's `expiresIn`.
///
/// The economy backend sends an absolute epoch-millisecond deadline under
/// that name; a plain lifetime in seconds is accepted too.
fn expiry(expires_in: Option<i64>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let value = expires_in.filter(|v| *v > 0)?;
    if value >= EPOCH_MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(value)
    } else {
        now.checked_add_signed(Duration::seconds(value))
    }
}

/// The `/api/auth/*` endpoints over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: HttpClient,
}

impl HttpAuthApi {
    /// Create an auth API for the given backend.
    pub fn new(api: ApiUrl) -> Result<Self> {
        Ok(Self::from_client(HttpClient::new(api)?))
    }

    /// Share an existing client's connection pool.
    pub fn from_client(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutput> {
        let request = LoginRequest {
            username: credentials.username(),
            password: credentials.password(),
        };

        let builder = self.client.request(Method::POST, LOGIN, None)?.json(&request);
        let response = self.client.execute(builder).await?;
        let body: LoginResponse = self.client.json(response).await?;

        debug!(username = %body.username, roles = %body.roles, "Login accepted");

        Ok(LoginOutput {
            access_token: AccessToken::new(body.token),
            refresh_token: RefreshToken::new(body.refresh_token),
            identity: Identity::new(body.username, body.roles),
            expires_at: expiry(body.expires_in, Utc::now()),
        })
    }

    #[instrument(skip(self, token))]
    async fn logout(&self, token: &AccessToken) -> Result<()> {
        let builder = self.client.request(Method::POST, LOGOUT, Some(token))?;
        self.client.execute(builder).await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn current_user(&self, token: &AccessToken) -> Result<Identity> {
        let builder = self.client.request(Method::GET, ME, Some(token))?;
        let response = self.client.execute(builder).await?;
        let body: UserResponse = self.client.json(response).await?;
        Ok(Identity::new(body.username, body.roles))
    }

    #[instrument(skip(self, token))]
    async fn validate(&self, token: &AccessToken) -> Result<bool> {
        let builder = self.client.request(Method::GET, VALIDATE, Some(token))?;
        let response = self.client.execute(builder).await?;
        let body: ValidateResponse = self.client.json(response).await?;
        Ok(body.valid)
    }
}
