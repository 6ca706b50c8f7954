//! HTTP client plumbing shared by the auth API and the interceptor.

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use econ_admin_core::error::{InvalidInputError, ProtocolError, TransportError};
use econ_admin_core::{AccessToken, ApiUrl, Error, Result};

use crate::endpoints::ErrorResponse;

pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(err)
}

/// HTTP client bound to one backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl HttpClient {
    /// Create a client for the given backend.
    pub fn new(api: ApiUrl) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("econ-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self { client, api })
    }

    /// Returns the backend URL this client is configured for.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// Start a request, attaching `token` as a bearer credential if given.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&AccessToken>,
    ) -> Result<RequestBuilder> {
        let url = self.api.endpoint_url(path);
        let mut builder = self.client.request(method, url);

        if let Some(token) = token {
            let value = HeaderValue::from_str(&token.bearer()).map_err(|_| {
                InvalidInputError::Other {
                    message: "access token contains invalid header characters".to_string(),
                }
            })?;
            builder = builder.header(AUTHORIZATION, value);
        }

        Ok(builder)
    }

    /// Send a request; non-success statuses become [`ProtocolError`]s.
    #[instrument(skip(self, builder), fields(api = %self.api))]
    pub(crate) async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(status = %status, url = %response.url().path(), "Backend response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    /// Decode a success body as JSON.
    pub(crate) async fn json<R: DeserializeOwned>(&self, response: Response) -> Result<R> {
        response.json::<R>().await.map_err(transport_error)
    }

    async fn parse_error_response(&self, response: Response) -> ProtocolError {
        let status = response.status().as_u16();

        let body = response.text().await.unwrap_or_default();
        trace!(status, body = %body, "Error response body");

        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error_body) => ProtocolError::new(status, error_body.error, error_body.message),
            Err(_) => ProtocolError::new(status, None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let api = ApiUrl::new("https://economy.example.com").unwrap();
        let client = HttpClient::new(api.clone()).unwrap();
        assert_eq!(client.api(), &api);
    }

    #[test]
    fn attaches_bearer_header() {
        let api = ApiUrl::new("http://localhost:8080").unwrap();
        let client = HttpClient::new(api).unwrap();

        let request = client
            .request(Method::GET, "/api/skills", Some(&AccessToken::new("abc")))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/skills");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer abc");

        let anonymous = client
            .request(Method::GET, "/api/skills", None)
            .unwrap()
            .build()
            .unwrap();
        assert!(anonymous.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn rejects_token_with_newline() {
        let api = ApiUrl::new("http://localhost:8080").unwrap();
        let client = HttpClient::new(api).unwrap();
        assert!(
            client
                .request(Method::GET, "/", Some(&AccessToken::new("a\nb")))
                .is_err()
        );
    }
}
