//! MatchInsight command-line runner
//!
//! Loads configuration, initialises structured logging, aggregates one
//! fixture and prints its context as JSON. Ctrl+C cancels the run cleanly.
//!
//! Usage: `matchinsight <sport> <home team> <away team>`

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use matchinsight::config::AppConfig;
use matchinsight::provider::governor::cancel_pair;
use matchinsight::types::Sport;
use matchinsight::MatchInsight;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [sport, home, away] = args.as_slice() else {
        bail!("usage: matchinsight <sport> <home team> <away team>");
    };
    let sport: Sport = sport.parse()?;

    let cfg = match AppConfig::load(CONFIG_PATH) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "Using default configuration");
            AppConfig::default()
        }
    };
    let engine = MatchInsight::from_config(&cfg).context("Failed to build engine")?;

    info!(sport = %sport, home = %home, away = %away, "Fetching match context");

    let (handle, cancel) = cancel_pair();
    let fetch = engine.get_match_context_with(sport, home, away, &cancel);
    tokio::pin!(fetch);

    let context = tokio::select! {
        result = &mut fetch => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, cancelling");
            handle.cancel();
            fetch.await?
        }
    };

    let missing = context.missing_fields();
    if !missing.is_empty() {
        warn!(missing = ?missing, "Some context fields could not be fetched");
    }
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("matchinsight=info"));

    let json_logging = std::env::var("MATCHINSIGHT_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
