//! # lib_kappa
//!
//! Client library for the Kappa financial-advice backend. Every endpoint goes
//! through a single request gateway that merges headers, classifies the HTTP
//! status, decodes JSON and reports failures to a notification sink.
//!
//! Modules are gated by cargo features named after their folders; enable
//! `full` to get everything.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Endpoint call-sites for authentication, financial data and media uploads.
#[cfg(feature = "apis")]
pub mod apis;
/// Layered client configuration.
#[cfg(feature = "configs")]
pub mod configs;
/// Credential token storage capability.
#[cfg(feature = "credentials")]
pub mod credentials;
/// Structured logging setup.
#[cfg(feature = "loggers")]
pub mod loggers;
/// Notification sinks for user-facing failure reports.
#[cfg(feature = "notify")]
pub mod notify;
/// The request gateway and its error contract.
#[cfg(feature = "retrieve")]
pub mod retrieve;

#[cfg(feature = "apis")]
pub use apis::{AuthApi, FinancialApi, MediaApi};
#[cfg(feature = "credentials")]
pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
#[cfg(feature = "notify")]
pub use notify::{Notification, NotificationSink, Severity};
#[cfg(feature = "retrieve")]
pub use retrieve::{ErrorDetail, Gateway, GatewayConfig, GatewayError, RequestBody, RequestOptions};
