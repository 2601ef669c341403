//! Request bodies and response records exchanged with the Kappa backend.
//!
//! Responses are handed back to callers as `serde_json::Value`; the records
//! here are for callers who want to decode them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Body of `POST /login` on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session token to keep in the credential store.
    pub access_token: String,
    /// Usually `"bearer"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// Profile image reference; empty when not supplied.
    #[serde(default)]
    pub image: String,
}

impl RegisterRequest {
    /// A registration without a profile image.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            image: String::new(),
        }
    }

    /// Sets the profile image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// Body of `POST /financial/advice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub username: String,
    pub password: String,
    /// The user's question.
    pub message: String,
    /// Ticker the question is about.
    pub stock: String,
}

/// Body of the single-ticker endpoints (`/stock-chart`, `/stock-price`).
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct StockRequest<'a> {
    pub stock: &'a str,
}

/// Risk appetite passed along with a RAG query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTolerance::Low => "low",
            RiskTolerance::Medium => "medium",
            RiskTolerance::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for RiskTolerance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskTolerance::Low),
            "medium" => Ok(RiskTolerance::Medium),
            "high" => Ok(RiskTolerance::High),
            other => Err(format!("unknown risk tolerance '{}', expected low, medium or high", other)),
        }
    }
}

/// Optional hints narrowing a RAG query. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_tolerance: Option<RiskTolerance>,
}

impl RagContext {
    /// `true` when no hint is set.
    pub fn is_empty(&self) -> bool {
        self.ticker.is_none() && self.timeframe.is_none() && self.risk_tolerance.is_none()
    }
}

/// Body of `POST /rag/query`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RagQuery<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a RagContext>,
}

/// Kind of recording uploaded to `/embed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Voice,
    Video,
}

impl MediaKind {
    /// Value of the multipart `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Voice => "voice",
            MediaKind::Video => "video",
        }
    }

    /// MIME type used for the uploaded part.
    pub fn mime(&self) -> &'static str {
        match self {
            MediaKind::Voice => "audio/webm",
            MediaKind::Video => "video/webm",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "voice" => Ok(MediaKind::Voice),
            "video" => Ok(MediaKind::Video),
            other => Err(format!("unknown media type '{}', expected voice or video", other)),
        }
    }
}

/// One quote record returned by `/stock-price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDataItem {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Short Name")]
    pub short_name: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Market Price")]
    pub market_price: f64,
    #[serde(rename = "Market Change")]
    pub market_change: f64,
    /// Preformatted by the backend, e.g. `"1.25%"`.
    #[serde(rename = "Change Percent")]
    pub change_percent: String,
    #[serde(rename = "Day High")]
    pub day_high: f64,
    #[serde(rename = "Day Low")]
    pub day_low: f64,
    #[serde(rename = "Market Volume")]
    pub market_volume: f64,
    #[serde(rename = "Previous Close")]
    pub previous_close: f64,
    #[serde(rename = "Market Cap")]
    pub market_cap: f64,
    #[serde(rename = "Market State")]
    pub market_state: String,
}

/// Decodes a `/stock-price` payload into quote records.
///
/// # Errors
/// Fails when the payload is not an array of records of the expected shape.
pub fn parse_price_data(value: &Value) -> Result<Vec<PriceDataItem>, serde_json::Error> {
    Vec::<PriceDataItem>::deserialize(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_records_use_spaced_keys() {
        let payload = json!([{
            "Symbol": "AAPL",
            "Short Name": "Apple Inc.",
            "Currency": "USD",
            "Market Price": 189.5,
            "Market Change": -1.2,
            "Change Percent": "-0.63%",
            "Day High": 191.0,
            "Day Low": 188.1,
            "Market Volume": 51234567,
            "Previous Close": 190.7,
            "Market Cap": 2950000000000.0,
            "Market State": "REGULAR"
        }]);

        let items = parse_price_data(&payload).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].symbol, "AAPL");
        assert_eq!(items[0].short_name, "Apple Inc.");
        assert_eq!(items[0].market_volume, 51234567.0);
        assert_eq!(items[0].market_state, "REGULAR");
    }

    #[test]
    fn price_payload_of_wrong_shape_is_rejected() {
        assert!(parse_price_data(&json!({"detail": "x"})).is_err());
    }

    #[test]
    fn rag_query_omits_absent_context() {
        let q = RagQuery { query: "is AAPL a buy?", context: None };
        assert_eq!(serde_json::to_value(q).unwrap(), json!({"query": "is AAPL a buy?"}));
    }

    #[test]
    fn rag_context_is_camel_case_and_sparse() {
        let ctx = RagContext {
            ticker: Some("MSFT".into()),
            timeframe: None,
            risk_tolerance: Some(RiskTolerance::High),
        };
        let q = RagQuery { query: "outlook", context: Some(&ctx) };
        assert_eq!(
            serde_json::to_value(q).unwrap(),
            json!({"query": "outlook", "context": {"ticker": "MSFT", "riskTolerance": "high"}})
        );
        assert!(!ctx.is_empty());
        assert!(RagContext::default().is_empty());
    }

    #[test]
    fn register_request_defaults_image_to_empty() {
        let req = RegisterRequest::new("a", "b", "Ada", "Lovelace");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"username": "a", "password": "b", "first_name": "Ada", "last_name": "Lovelace", "image": ""})
        );
    }

    #[test]
    fn enums_parse_from_cli_text() {
        assert_eq!("HIGH".parse::<RiskTolerance>().unwrap(), RiskTolerance::High);
        assert!("extreme".parse::<RiskTolerance>().is_err());
        assert_eq!("video".parse::<MediaKind>().unwrap(), MediaKind::Video);
        assert_eq!(MediaKind::Voice.to_string(), "voice");
    }

    #[test]
    fn login_response_tolerates_missing_token_type() {
        let r: LoginResponse = serde_json::from_value(json!({"access_token": "t"})).unwrap();
        assert_eq!(r.access_token, "t");
        assert_eq!(r.token_type, None);
    }
}
