use clap::Parser;
use lib_kappa::apis::SessionError;
use lib_kappa::retrieve::GatewayError;

mod kappa_logic;
use kappa_logic::{args::Cli, commands};

#[tokio::main]
async fn main() {
    // A missing .env is fine; real environment variables still apply
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli).await {
        // Gateway failures were already shown by the console sink
        let shown = e.downcast_ref::<GatewayError>().is_some()
            || matches!(e.downcast_ref::<SessionError>(), Some(SessionError::Gateway(_)));
        if !shown {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}
