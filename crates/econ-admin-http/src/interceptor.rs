//! Request/response interception for authenticated backend calls.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{instrument, warn};

use econ_admin_core::error::AuthError;
use econ_admin_core::{AccessToken, AuthService, Error, Result};

use crate::client::HttpClient;

/// Backend client that every non-auth call goes through.
///
/// Holds no token of its own: each request reads the session's current
/// token at send time. When the server answers 401 to the token the session
/// still holds, the session is logged out before the caller sees the error.
/// The request itself is not retried.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use econ_admin_core::AuthService;
/// use econ_admin_http::{ApiClient, HttpClient};
///
/// # async fn example(client: HttpClient, auth: Arc<AuthService>) -> econ_admin_core::Result<()> {
/// let api = ApiClient::new(client, auth);
/// let skills: serde_json::Value = api.get("/api/skills").await?;
/// println!("{skills}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: HttpClient,
    auth: Arc<AuthService>,
}

impl ApiClient {
    pub fn new(client: HttpClient, auth: Arc<AuthService>) -> Self {
        Self { client, auth }
    }

    pub fn auth(&self) -> &Arc<AuthService> {
        &self.auth
    }

    /// `GET path`, decoding a JSON body.
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self.dispatch(Method::GET, path, |b| b).await?;
        self.client.json(response).await
    }

    /// `POST path` with a JSON body, decoding a JSON body.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.dispatch(Method::POST, path, |b| b.json(body)).await?;
        self.client.json(response).await
    }

    /// `PUT path` with a JSON body, decoding a JSON body.
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.dispatch(Method::PUT, path, |b| b.json(body)).await?;
        self.client.json(response).await
    }

    /// `DELETE path`, ignoring any body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.dispatch(Method::DELETE, path, |b| b).await?;
        Ok(())
    }

    #[instrument(skip(self, build))]
    async fn dispatch<F>(&self, method: Method, path: &str, build: F) -> Result<Response>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let token = self.auth.session().access_token();
        let builder = build(self.client.request(method, path, token.as_ref())?);

        match self.client.execute(builder).await {
            Err(e) if e.is_unauthorized() && self.still_current(token.as_ref()) => {
                warn!(error = %e, "Session rejected by server, logging out");
                self.auth.logout().await;
                Err(Error::Auth(AuthError::SessionInvalidated))
            }
            other => other,
        }
    }

    /// Whether the token a request carried is still the session's token.
    ///
    /// A rejection of a token that has since been replaced or dropped says
    /// nothing about the current session.
    fn still_current(&self, sent: Option<&AccessToken>) -> bool {
        match sent {
            Some(sent) => self.auth.session().access_token().as_ref() == Some(sent),
            None => false,
        }
    }
}
