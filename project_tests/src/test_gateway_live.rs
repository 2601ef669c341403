//! # Live Gateway Smoke Test
//!
//! Runs a handful of read-only calls against a real Kappa backend. The
//! origin comes from `KAPPA_BASE_URL` (a `.env` file is honoured) and falls
//! back to the hosted deployment.
//!
//! The hosted backend sleeps when idle, so the first call may take a while.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use lib_kappa::apis::KappaApi;
use lib_kappa::apis::models::parse_price_data;
use lib_kappa::credentials::MemoryCredentialStore;
use lib_kappa::loggers::init_logging;
use lib_kappa::notify::TracingSink;
use lib_kappa::retrieve::{DEFAULT_BASE_URL, Gateway, GatewayConfig, GatewayError, RequestOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging("info", false)?;

    // 1. Build the gateway
    let base_url = std::env::var("KAPPA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let config = GatewayConfig {
        base_url: base_url.clone(),
        timeout: Some(Duration::from_secs(90)),
        attach_bearer: false,
    };
    let gateway = Gateway::new(config, Arc::new(MemoryCredentialStore::new()), Arc::new(TracingSink))?;
    let api = KappaApi::new(gateway.clone());

    println!("--- Starting live gateway checks against {} ---", base_url);

    // 2. News never fails, even when the backend does
    println!("\n[Test 1] Stock news...");
    let news = api.financial.get_stock_news("AAPL").await;
    println!("✅ News payload: {}", truncate(&news.to_string(), 120));

    // 3. Price, decoded into quote records when possible
    println!("\n[Test 2] Stock price...");
    match api.financial.get_stock_price("AAPL").await {
        Ok(price) => match parse_price_data(&price) {
            Ok(items) => println!("✅ {} quote record(s), first: {:?}", items.len(), items.first().map(|i| &i.symbol)),
            Err(e) => println!("⚠️ Price payload has another shape ({}): {}", e, truncate(&price.to_string(), 120)),
        },
        Err(e) => println!("⚠️ Price call failed: {}", e),
    }

    // 4. An unknown path must come back as a status error
    println!("\n[Test 3] Unknown endpoint...");
    match gateway.send("/definitely-not-here", RequestOptions::get()).await {
        Err(GatewayError::Status { status, message, .. }) => {
            println!("✅ Status error {} with message '{}'", status, message)
        }
        other => println!("❌ Expected a status error, got {:?}", other),
    }

    // 5. A pre-cancelled token never reaches the network
    println!("\n[Test 4] Cancellation...");
    let token = CancellationToken::new();
    token.cancel();
    match gateway.send("/stock-chart", RequestOptions::post().cancel_on(token)).await {
        Err(GatewayError::Cancelled) => println!("✅ Call cancelled"),
        other => println!("❌ Expected cancellation, got {:?}", other),
    }

    println!("\n--- Live gateway checks finished ---");
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}
