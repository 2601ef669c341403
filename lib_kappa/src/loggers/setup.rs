use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// `level` is an `EnvFilter` directive such as `info` or
/// `lib_kappa=debug,warn`; a `RUST_LOG` variable takes precedence over it.
/// Events go to stderr so command output on stdout stays machine-readable.
///
/// # Errors
/// Fails on an unparsable directive or when a subscriber is already set.
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(from_env) if !from_env.trim().is_empty() => EnvFilter::try_new(from_env)?,
        _ => EnvFilter::try_new(level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if json {
        builder.json().try_init().map_err(|e| anyhow!(e))?;
    } else {
        builder.try_init().map_err(|e| anyhow!(e))?;
    }

    Ok(())
}
