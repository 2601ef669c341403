use crate::kappa_logic::args::{Cli, Command};
use crate::kappa_logic::render;
use anyhow::{anyhow, Context, Result};
use lib_kappa::apis::models::{parse_price_data, AdviceRequest, RagContext, RegisterRequest};
use lib_kappa::apis::KappaApi;
use lib_kappa::configs::ClientConfig;
use lib_kappa::credentials::{CredentialStore, FileCredentialStore};
use lib_kappa::loggers::init_logging;
use lib_kappa::notify::ConsoleSink;
use lib_kappa::retrieve::Gateway;
use std::sync::Arc;

pub async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::load_layered(cli.config_path.as_deref(), cli.overlay())?;

    init_logging(
        config.log_level.as_deref().unwrap_or("info"),
        config.log_json.unwrap_or(false),
    )?;

    let credentials_file = config.credentials_file();
    tracing::debug!(credentials = %credentials_file.display(), "Configuration loaded");

    let store = Arc::new(FileCredentialStore::new(credentials_file));
    // Construction errors never reach the sink, so keep them out of the GatewayError type
    let gateway = Gateway::new(config.gateway_config()?, store.clone(), Arc::new(ConsoleSink))
        .map_err(|e| anyhow!("Failed to create gateway: {}", e))?;
    let api = KappaApi::new(gateway);

    match cli.command {
        Command::Login { username, password } => {
            let session = api.auth.login_and_store(&username, &password).await?;
            println!(
                "Logged in as {} (token stored at {})",
                username,
                store.path().display()
            );
            tracing::debug!(token_type = ?session.token_type, "Login complete");
        }
        Command::Register {
            username,
            password,
            first_name,
            last_name,
            image,
        } => {
            let request = RegisterRequest::new(username, password, first_name, last_name).with_image(image);
            let created = api.auth.register(&request).await?;
            println!("{}", render::json(&created));
        }
        Command::Logout => {
            api.auth
                .logout()
                .with_context(|| format!("Failed to clear {}", store.path().display()))?;
            println!("Logged out");
        }
        Command::Token => match store.get() {
            Some(token) => println!("Session token stored ({} chars) at {}", token.len(), store.path().display()),
            None => println!("No session token stored"),
        },
        Command::News { ticker } => {
            let news = api.financial.get_stock_news(&ticker).await;
            println!("{}", render::json(&news));
        }
        Command::Advice {
            username,
            password,
            stock,
            message,
        } => {
            let request = AdviceRequest {
                username,
                password,
                message,
                stock,
            };
            let advice = api.financial.query_stock_advice(&request).await?;
            println!("{}", render::json(&advice));
        }
        Command::Chart { stock } => {
            let chart = api.financial.get_stock_chart(&stock).await?;
            println!("{}", render::json(&chart));
        }
        Command::Price { stock, raw } => {
            let price = api.financial.get_stock_price(&stock).await?;
            match parse_price_data(&price) {
                Ok(items) if !raw => print!("{}", render::price_table(&items)),
                Ok(_) => println!("{}", render::json(&price)),
                Err(e) => {
                    tracing::debug!(error = %e, "Price payload is not a quote list, printing raw JSON");
                    println!("{}", render::json(&price));
                }
            }
        }
        Command::Rag {
            query,
            ticker,
            timeframe,
            risk,
        } => {
            let context = RagContext {
                ticker,
                timeframe,
                risk_tolerance: risk,
            };
            let context = (!context.is_empty()).then_some(&context);
            let answer = api.financial.send_rag_query(&query, context).await?;
            println!("{}", render::json(&answer));
        }
        Command::Embed { file, kind } => {
            let media = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "blob".to_string());
            let embedding = api.media.create_embedding(media, &file_name, kind).await?;
            println!("{}", render::json(&embedding));
        }
    }

    Ok(())
}
