//! Rotalog CLI - load a properties file and emit sample records
//! through every configured appender

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rotalog::LoggingContext;
use rotalog_core::constants::CONFIG_FILE;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rotalog", about = "Demonstrate a rotalog configuration", version)]
struct Cli {
    /// Path to the properties file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Logger name to emit the named demo records under
    #[arg(short, long, default_value = "demo")]
    name: String,

    /// Internal diagnostics verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("rotalog={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let context = LoggingContext::load(&cli.config)?;

    for logger in [context.get_logger(""), context.get_logger(&cli.name)] {
        logger.debug("starting up");
        logger.info("demo run");
        logger.warning("something to watch");
        logger.error("something went wrong");
    }

    context.flush();
    Ok(())
}
