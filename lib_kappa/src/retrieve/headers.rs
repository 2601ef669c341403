//! # Header Merging
//!
//! Every request starts from the default header set (`Content-Type:
//! application/json`) and layers the caller's overrides on top. Names compare
//! case-insensitively and are stored lowercased. A caller can drop a default
//! outright with [`HeaderSetting::Unset`], which multipart uploads need so the
//! transport can write its own boundary.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::collections::BTreeMap;

/// Media type sent when the caller does not say otherwise.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// What a caller wants done with one header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderSetting {
    /// Send the header with this value, replacing any default.
    Set(String),
    /// Remove the header from the merged set entirely.
    Unset,
}

/// Caller-supplied header overrides for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderOverrides {
    entries: BTreeMap<String, HeaderSetting>,
}

impl HeaderOverrides {
    /// Creates an empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`HeaderOverrides::insert`] with a value.
    pub fn set(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(name, HeaderSetting::Set(value.into()));
        self
    }

    /// Builder form of [`HeaderOverrides::insert`] that removes the header.
    pub fn unset(mut self, name: impl AsRef<str>) -> Self {
        self.insert(name, HeaderSetting::Unset);
        self
    }

    /// Records a setting for `name`. A later call for the same name wins.
    pub fn insert(&mut self, name: impl AsRef<str>, setting: HeaderSetting) {
        self.entries.insert(normalize(name.as_ref()), setting);
    }

    /// Looks up the setting for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&HeaderSetting> {
        self.entries.get(&normalize(name))
    }

    /// Iterates over `(lowercased name, setting)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderSetting)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `true` when no override was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The header set applied to every request before caller overrides.
pub fn default_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(CONTENT_TYPE.as_str().to_string(), DEFAULT_CONTENT_TYPE.to_string());
    headers
}

/// Merges `overrides` over `defaults`.
///
/// For a name present in both, the override decides: `Set` replaces the
/// value and `Unset` removes the name. Names only in `defaults` are kept as-is.
pub fn merge_headers(
    defaults: &BTreeMap<String, String>,
    overrides: &HeaderOverrides,
) -> BTreeMap<String, String> {
    let mut merged: BTreeMap<String, String> = defaults
        .iter()
        .map(|(k, v)| (normalize(k), v.clone()))
        .collect();

    for (name, setting) in overrides.iter() {
        match setting {
            HeaderSetting::Set(value) => {
                merged.insert(name.to_string(), value.clone());
            }
            HeaderSetting::Unset => {
                merged.remove(name);
            }
        }
    }

    merged
}

/// Converts a merged header set into a `reqwest` header map.
///
/// # Errors
/// Returns a message naming the offending header when a name or value is
/// not valid on the wire.
pub fn to_header_map(merged: &BTreeMap<String, String>) -> Result<HeaderMap, String> {
    let mut map = HeaderMap::with_capacity(merged.len());
    for (name, value) in merged {
        let h_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| format!("Invalid header name '{}': {}", name, e))?;
        let h_value = HeaderValue::from_str(value)
            .map_err(|e| format!("Invalid value for header '{}': {}", name, e))?;
        map.insert(h_name, h_value);
    }
    Ok(map)
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
