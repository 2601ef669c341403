//! # Kappa API Call-Sites
//!
//! Thin wrappers that give each backend endpoint its path, method and body
//! and hand the rest to the request gateway.
//!
//! ## Contained Modules:
//!
//! - **`auth`**: login, registration, logout.
//! - **`financial`**: news, advice, charts, prices, RAG queries.
//! - **`media`**: voice/video embedding uploads.
//! - **`models`**: request bodies and response records.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Login, registration and logout.
pub mod auth;
/// Stock news, advice, charts, prices and RAG queries.
pub mod financial;
/// Multipart media uploads.
pub mod media;
/// Request and response shapes.
pub mod models;

pub use auth::{AuthApi, SessionError};
pub use financial::FinancialApi;
pub use media::MediaApi;

use crate::retrieve::Gateway;

/// All call-sites sharing one gateway.
#[derive(Clone)]
pub struct KappaApi {
    /// Authentication endpoints.
    pub auth: AuthApi,
    /// Financial data endpoints.
    pub financial: FinancialApi,
    /// Media endpoints.
    pub media: MediaApi,
}

impl KappaApi {
    /// Builds every call-site on top of `gateway`.
    pub fn new(gateway: Gateway) -> Self {
        Self {
            auth: AuthApi::new(gateway.clone()),
            financial: FinancialApi::new(gateway.clone()),
            media: MediaApi::new(gateway),
        }
    }
}
