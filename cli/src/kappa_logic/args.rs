use clap::{Parser, Subcommand};
use lib_kappa::apis::models::{MediaKind, RiskTolerance};
use lib_kappa::configs::ClientConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "kappa", about = "Command-line client for the Kappa financial-advice backend", version)]
pub struct Cli {
    #[clap(long, global = true, env = "KAPPA_BASE_URL", help = "Backend origin every endpoint is appended to.")]
    pub base_url: Option<String>,

    #[clap(long, global = true, env = "KAPPA_CONFIG_PATH", help = "Path to the JSON configuration file.")]
    pub config_path: Option<PathBuf>,

    #[clap(long, global = true, env = "KAPPA_TIMEOUT_SECS", help = "Per-request deadline in seconds (0 disables it).")]
    pub timeout_secs: Option<u64>,

    #[clap(long, global = true, env = "KAPPA_ATTACH_BEARER", help = "Send the stored token as an Authorization header (true/false).")]
    pub attach_bearer: Option<bool>,

    #[clap(long, global = true, env = "KAPPA_CREDENTIALS_PATH", help = "JSON file holding the session token.")]
    pub credentials_path: Option<PathBuf>,

    #[clap(long, global = true, env = "KAPPA_LOG_LEVEL", help = "Log filter (trace, debug, info, warn, error or a directive list).")]
    pub log_level: Option<String>,

    #[clap(long, global = true, env = "KAPPA_LOG_JSON", help = "Emit logs as JSON lines (true/false).")]
    pub log_json: Option<bool>,

    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Environment and command-line values as the top configuration layer.
    pub fn overlay(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            attach_bearer: self.attach_bearer,
            credentials_path: self.credentials_path.clone(),
            log_level: self.log_level.clone(),
            log_json: self.log_json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session token.
    Login {
        #[clap(long, short)]
        username: String,
        #[clap(long, short, env = "KAPPA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account.
    Register {
        #[clap(long, short)]
        username: String,
        #[clap(long, short, env = "KAPPA_PASSWORD", hide_env_values = true)]
        password: String,
        #[clap(long)]
        first_name: String,
        #[clap(long)]
        last_name: String,
        #[clap(long, default_value = "")]
        image: String,
    },

    /// Forget the stored session token.
    Logout,

    /// Show whether a session token is stored.
    Token,

    /// Latest news for a ticker. Never fails; prints "" when unavailable.
    News { ticker: String },

    /// Ask the advisor a question about a stock.
    Advice {
        #[clap(long, short)]
        username: String,
        #[clap(long, short, env = "KAPPA_PASSWORD", hide_env_values = true)]
        password: String,
        #[clap(long, short)]
        stock: String,
        message: String,
    },

    /// Chart data for a ticker.
    Chart { stock: String },

    /// Quote for a ticker.
    Price {
        stock: String,
        #[clap(long, help = "Print the JSON payload instead of a table.")]
        raw: bool,
    },

    /// Free-form question answered by the retrieval pipeline.
    Rag {
        query: String,
        #[clap(long)]
        ticker: Option<String>,
        #[clap(long)]
        timeframe: Option<String>,
        #[clap(long, help = "low, medium or high")]
        risk: Option<RiskTolerance>,
    },

    /// Upload a voice or video recording for embedding.
    Embed {
        file: PathBuf,
        #[clap(long = "type", default_value = "voice", help = "voice or video")]
        kind: MediaKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_options_land_in_the_overlay() {
        let cli = Cli::try_parse_from([
            "kappa",
            "price",
            "AAPL",
            "--base-url",
            "http://127.0.0.1:9000",
            "--timeout-secs",
            "3",
        ])
        .unwrap();

        let overlay = cli.overlay();
        assert_eq!(overlay.base_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(overlay.timeout_secs, Some(3));
        assert!(matches!(cli.command, Command::Price { ref stock, raw: false } if stock == "AAPL"));
    }

    #[test]
    fn rag_and_embed_parse_typed_values() {
        let cli = Cli::try_parse_from(["kappa", "rag", "outlook?", "--risk", "medium"]).unwrap();
        assert!(matches!(cli.command, Command::Rag { risk: Some(RiskTolerance::Medium), .. }));

        let cli = Cli::try_parse_from(["kappa", "embed", "clip.webm", "--type", "video"]).unwrap();
        assert!(matches!(cli.command, Command::Embed { kind: MediaKind::Video, .. }));

        assert!(Cli::try_parse_from(["kappa", "embed", "clip.webm", "--type", "photo"]).is_err());
    }
}
