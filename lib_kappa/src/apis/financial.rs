//! # Financial Data Calls
//!
//! News, advice, charts, prices and RAG queries. All of them return the
//! backend's JSON untouched, except [`FinancialApi::get_stock_news`], which
//! never fails: on any error it yields an empty string.

use crate::apis::models::{AdviceRequest, RagContext, RagQuery, StockRequest};
use crate::retrieve::{Gateway, GatewayError, RequestOptions};
use reqwest::Method;
use serde_json::Value;
use url::form_urlencoded;

/// Financial data endpoints.
#[derive(Clone)]
pub struct FinancialApi {
    gateway: Gateway,
}

impl FinancialApi {
    /// Wraps `gateway`.
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `GET /stock-advise/news?ticker=<ticker>`.
    ///
    /// Failures are still logged and notified by the gateway, but the caller
    /// gets `Value::String("")` instead of an error.
    pub async fn get_stock_news(&self, ticker: &str) -> Value {
        let encoded: String = form_urlencoded::byte_serialize(ticker.as_bytes()).collect();
        let path = format!("/stock-advise/news?ticker={}", encoded);

        match self.gateway.send(&path, RequestOptions::get()).await {
            Ok(news) => news,
            Err(e) => {
                tracing::warn!(ticker, error = %e, "Error fetching stock news");
                Value::String(String::new())
            }
        }
    }

    /// `POST /financial/advice`.
    pub async fn query_stock_advice(&self, request: &AdviceRequest) -> Result<Value, GatewayError> {
        self.gateway
            .send_json("/financial/advice", Method::POST, request)
            .await
    }

    /// `POST /stock-chart` for one ticker.
    pub async fn get_stock_chart(&self, stock: &str) -> Result<Value, GatewayError> {
        self.gateway
            .send_json("/stock-chart", Method::POST, &StockRequest { stock })
            .await
    }

    /// `POST /stock-price` for one ticker.
    ///
    /// Decode the result with [`crate::apis::models::parse_price_data`] if a
    /// typed view is needed.
    pub async fn get_stock_price(&self, stock: &str) -> Result<Value, GatewayError> {
        self.gateway
            .send_json("/stock-price", Method::POST, &StockRequest { stock })
            .await
    }

    /// `POST /rag/query`. An absent `context` is left out of the body.
    pub async fn send_rag_query(&self, query: &str, context: Option<&RagContext>) -> Result<Value, GatewayError> {
        self.gateway
            .send_json("/rag/query", Method::POST, &RagQuery { query, context })
            .await
    }
}
