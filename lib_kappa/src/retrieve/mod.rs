//! # Data Retrieval Module
//!
//! Home of the request gateway every API call-site goes through. The gateway
//! owns the concerns shared by all endpoints: joining the endpoint onto the
//! base origin, merging default and caller headers, classifying the response
//! status, decoding JSON and mirroring failures to the notification sink.
//!
//! ## Contained Modules:
//!
//! - **`gateway`**: the `Gateway` client built on `reqwest`.
//! - **`headers`**: default header set and the merge with caller overrides,
//!   including explicit removal of a default.
//! - **`error`**: `GatewayError`, `ErrorDetail` and the failure-message rules.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Error taxonomy and failure-message extraction.
pub mod error;
/// Request gateway built on `reqwest`.
pub mod gateway;
/// Header defaults and merge rules.
pub mod headers;

pub use error::{ErrorDetail, GatewayError};
pub use gateway::{Gateway, GatewayConfig, RequestBody, RequestOptions, DEFAULT_BASE_URL};
pub use headers::{HeaderOverrides, HeaderSetting};
