//! econ-admin-http - The backend auth contract over HTTP.
//!
//! [`HttpAuthApi`] implements [`AuthApi`](econ_admin_core::AuthApi) against
//! the `/api/auth/*` endpoints. [`ApiClient`] is the interceptor every other
//! backend call goes through: it attaches the session's bearer token and
//! drops the session when the server answers 401.

mod auth_api;
mod client;
mod endpoints;
mod interceptor;

pub use auth_api::HttpAuthApi;
pub use client::HttpClient;
pub use interceptor::ApiClient;
