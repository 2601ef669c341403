//! # Request Gateway
//!
//! Asynchronous client around `reqwest` that every Kappa endpoint goes
//! through. One call is one attempt: there is no retry or backoff. A call
//! either yields decoded JSON or fails with a [`GatewayError`], and each
//! failure is logged and mirrored to the notification sink exactly once.

use crate::credentials::CredentialStore;
use crate::notify::{Notification, NotificationSink};
use crate::retrieve::error::GatewayError;
use crate::retrieve::headers::{default_headers, merge_headers, to_header_map, HeaderOverrides, HeaderSetting};
use reqwest::header::AUTHORIZATION;
use reqwest::{multipart, Method, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Backend origin used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://kappa-financial-advice-system-backend.onrender.com";

/// Deadline applied to calls that do not set their own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Title of the notification raised for every failed call.
pub const FAILURE_TITLE: &str = "Request Failed";

/// Static settings of a [`Gateway`], fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Origin every endpoint path is appended to.
    pub base_url: String,
    /// Default deadline per call; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Send `Authorization: Bearer <token>` when a token is stored.
    pub attach_bearer: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            attach_bearer: false,
        }
    }
}

/// Payload of an outgoing request.
#[derive(Debug)]
pub enum RequestBody {
    /// Pre-encoded text (JSON or form-urlencoded).
    Text(String),
    /// Multipart form; pair it with `HeaderOverrides::unset("Content-Type")`
    /// so the transport writes the boundary header.
    Multipart(multipart::Form),
}

/// Per-call options. `Default` is a bodyless GET with no overrides.
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// HTTP verb.
    pub method: Method,
    /// Overrides merged over the default headers.
    pub headers: HeaderOverrides,
    /// Request payload, if any.
    pub body: Option<RequestBody>,
    /// Deadline for this call; falls back to [`GatewayConfig::timeout`].
    pub timeout: Option<Duration>,
    /// Aborts the call when cancelled.
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    /// Options for `method` with nothing else set.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// A bodyless GET.
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// A POST; attach a body with [`RequestOptions::body`].
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// Sets the payload.
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets header `name` to `value`, replacing any default.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, HeaderSetting::Set(value.into()));
        self
    }

    /// Drops header `name` from the merged set.
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.insert(name, HeaderSetting::Unset);
        self
    }

    /// Overrides the deadline for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ties the call to `token`.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// The request gateway.
///
/// Cheap to clone; clones share the connection pool, credential store and
/// notification sink.
#[derive(Clone)]
pub struct Gateway {
    /// Underlying HTTP client.
    inner: reqwest::Client,
    /// Origin without a trailing slash.
    base_url: String,
    /// Default per-call deadline.
    timeout: Option<Duration>,
    /// Whether the stored token is sent as a bearer header.
    attach_bearer: bool,
    /// Source of the session token, read on every call.
    credentials: Arc<dyn CredentialStore>,
    /// Receives one notification per failed call.
    sink: Arc<dyn NotificationSink>,
}

impl Gateway {
    /// Creates a gateway.
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidRequest`] when `config.base_url` is not an
    /// absolute URL or the HTTP client cannot be built.
    pub fn new(
        config: GatewayConfig,
        credentials: Arc<dyn CredentialStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, GatewayError> {
        Url::parse(&config.base_url).map_err(|e| GatewayError::InvalidRequest {
            message: format!("Invalid base URL '{}': {}", config.base_url, e),
        })?;

        let inner = reqwest::Client::builder()
            .user_agent(concat!("lib_kappa/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::InvalidRequest {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            inner,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            attach_bearer: config.attach_bearer,
            credentials,
            sink,
        })
    }

    /// Origin endpoints are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Credential store the gateway reads from.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Sends a request to `endpoint` and returns the decoded JSON body.
    ///
    /// # Errors
    /// Any [`GatewayError`]; the sink has already been notified when this returns.
    pub async fn send(&self, endpoint: &str, options: RequestOptions) -> Result<Value, GatewayError> {
        self.execute(endpoint, options)
            .await
            .map_err(|e| self.report_failure(endpoint, e))
    }

    /// Like [`Gateway::send`] but decodes the body into `T`.
    ///
    /// A body that is valid JSON but does not fit `T` is a
    /// [`GatewayError::Decode`].
    pub async fn send_as<T>(&self, endpoint: &str, options: RequestOptions) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let result = match self.execute(endpoint, options).await {
            Ok(value) => serde_json::from_value::<T>(value).map_err(|e| GatewayError::Decode {
                message: e.to_string(),
                status: None,
            }),
            Err(e) => Err(e),
        };
        result.map_err(|e| self.report_failure(endpoint, e))
    }

    /// Serializes `body` as JSON and sends it with `method`.
    pub async fn send_json<B>(&self, endpoint: &str, method: Method, body: &B) -> Result<Value, GatewayError>
    where
        B: Serialize + ?Sized,
    {
        let result = match serde_json::to_string(body) {
            Ok(text) => {
                let options = RequestOptions::new(method).body(RequestBody::Text(text));
                self.execute(endpoint, options).await
            }
            Err(e) => Err(GatewayError::InvalidRequest {
                message: format!("Failed to serialize request body: {}", e),
            }),
        };
        result.map_err(|e| self.report_failure(endpoint, e))
    }

    /// Logs `err` and forwards it to the sink, then hands it back.
    ///
    /// Call-sites use this for failures raised before the request is handed
    /// to the gateway, so those reach the user the same way.
    pub fn report_failure(&self, endpoint: &str, err: GatewayError) -> GatewayError {
        tracing::error!(endpoint, status = ?err.status(), error = %err, "API request failed");
        self.sink.notify(Notification::destructive(FAILURE_TITLE, err.to_string()));
        err
    }

    /// Builds, sends and classifies one request without reporting.
    async fn execute(&self, endpoint: &str, options: RequestOptions) -> Result<Value, GatewayError> {
        let RequestOptions {
            method,
            headers,
            body,
            timeout,
            cancel,
        } = options;

        // 1. Resolve the absolute URL
        let url = self.resolve(endpoint)?;

        // 2. Merge headers; the token is read every call even when not sent
        let token = self.credentials.get();
        tracing::trace!(has_token = token.is_some(), attach = self.attach_bearer, "Credential lookup");

        let mut defaults = default_headers();
        if self.attach_bearer {
            if let Some(token) = token {
                defaults.insert(AUTHORIZATION.as_str().to_string(), format!("Bearer {}", token));
            }
        }
        let merged = merge_headers(&defaults, &headers);
        let header_map = to_header_map(&merged).map_err(|message| GatewayError::InvalidRequest { message })?;

        // 3. Assemble the request
        let deadline = timeout.or(self.timeout);
        tracing::debug!(method = %method, url = %url, ?deadline, "Dispatching request");

        let mut req = self.inner.request(method, url).headers(header_map);
        if let Some(d) = deadline {
            req = req.timeout(d);
        }
        req = match body {
            Some(RequestBody::Text(text)) => req.body(text),
            Some(RequestBody::Multipart(form)) => req.multipart(form),
            None => req,
        };

        // 4. Execute, racing the caller's cancellation token if there is one
        let exchange = async {
            let response = req.send().await.map_err(|e| classify_reqwest(e, deadline))?;
            let status = response.status();
            let bytes = response.bytes().await.map_err(|e| classify_reqwest(e, deadline))?;
            Ok::<_, GatewayError>((status, bytes))
        };

        let (status, bytes) = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(GatewayError::Cancelled),
                outcome = exchange => outcome?,
            },
            None => exchange.await?,
        };

        // 5. Classify and decode
        classify_response(status, &bytes)
    }

    /// Appends `endpoint` to the base origin.
    fn resolve(&self, endpoint: &str) -> Result<Url, GatewayError> {
        let joined = if endpoint.is_empty() || endpoint.starts_with('/') || endpoint.starts_with('?') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        };
        Url::parse(&joined).map_err(|e| GatewayError::InvalidRequest {
            message: format!("Invalid endpoint '{}': {}", endpoint, e),
        })
    }
}

/// Turns a status and raw body into the call's outcome.
fn classify_response(status: StatusCode, bytes: &[u8]) -> Result<Value, GatewayError> {
    if status.is_success() {
        serde_json::from_slice::<Value>(bytes).map_err(|e| GatewayError::Decode {
            message: e.to_string(),
            status: Some(status.as_u16()),
        })
    } else {
        let raw = serde_json::from_slice::<Value>(bytes).unwrap_or_else(|_| Value::Object(Map::new()));
        Err(GatewayError::from_status(status.as_u16(), raw))
    }
}

fn classify_reqwest(err: reqwest::Error, deadline: Option<Duration>) -> GatewayError {
    if err.is_timeout() {
        if let Some(after) = deadline {
            return GatewayError::Timeout { after };
        }
    }
    if err.is_builder() {
        return GatewayError::InvalidRequest {
            message: crate::retrieve::error::error_chain(&err),
        };
    }
    GatewayError::transport(&err)
}
