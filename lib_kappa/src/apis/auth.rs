//! # Authentication Calls
//!
//! Login, registration and logout. The gateway never stores the token by
//! itself; [`AuthApi::login_and_store`] is the login flow that does.

use crate::apis::models::{LoginResponse, RegisterRequest};
use crate::credentials::CredentialError;
use crate::retrieve::{Gateway, GatewayError, RequestBody, RequestOptions};
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;
use url::form_urlencoded;

/// Failure of a login that also persists the token.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The login request itself failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The token arrived but could not be stored.
    #[error("Failed to store credentials: {0}")]
    Credentials(#[from] CredentialError),
}

/// Authentication endpoints.
#[derive(Clone)]
pub struct AuthApi {
    gateway: Gateway,
}

impl AuthApi {
    /// Wraps `gateway`.
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    fn login_options(username: &str, password: &str) -> RequestOptions {
        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("username", username)
            .append_pair("password", password)
            .finish();

        RequestOptions::post()
            .header("accept", "application/json")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(RequestBody::Text(form))
    }

    /// `POST /login` with form-encoded credentials. Returns the body as-is.
    pub async fn login(&self, username: &str, password: &str) -> Result<Value, GatewayError> {
        self.gateway
            .send("/login", Self::login_options(username, password))
            .await
    }

    /// Logs in and writes `access_token` to the credential store.
    pub async fn login_and_store(&self, username: &str, password: &str) -> Result<LoginResponse, SessionError> {
        let response: LoginResponse = self
            .gateway
            .send_as("/login", Self::login_options(username, password))
            .await?;
        self.gateway.credentials().set(&response.access_token)?;
        tracing::info!(username, "Session token stored");
        Ok(response)
    }

    /// `POST /register` with a JSON body.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, GatewayError> {
        self.gateway.send_json("/register", Method::POST, request).await
    }

    /// Forgets the stored token. No request is made.
    pub fn logout(&self) -> Result<(), CredentialError> {
        self.gateway.credentials().clear()
    }
}
