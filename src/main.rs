//! # ChoreWheel
//!
//! Rotates recurring chores between two household members, tracks due
//! dates, and reminds the responsible person by email or SMS.
//!
//! Usage:
//!   chorewheel                     # Serve on $PORT (default 8000)
//!   chorewheel --port 9000         # Custom port
//!   chorewheel --no-scheduler      # API only, no background reminders

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chorewheel_core::AppConfig;
use chorewheel_db::ChoreStore;
use chorewheel_gateway::AppState;
use chorewheel_notify::Dispatcher;
use chorewheel_scheduler::NotificationScheduler;

#[derive(Parser)]
#[command(name = "chorewheel", version, about = "🏠 ChoreWheel — household chore rotation")]
struct Cli {
    /// HTTP port (overrides $PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database path (overrides $CHOREWHEEL_DB)
    #[arg(long)]
    db_path: Option<String>,

    /// Scheduler interval in seconds (overrides $NOTIFY_INTERVAL_SECS)
    #[arg(long)]
    interval: Option<u64>,

    /// Disable the background notification scheduler
    #[arg(long)]
    no_scheduler: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = AppConfig::from_env();
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }
    if let Some(db_path) = cli.db_path {
        config.db_path = db_path.into();
    }
    if let Some(interval) = cli.interval {
        config.scheduler.interval_secs = interval;
    }
    if cli.no_scheduler {
        config.scheduler.enabled = false;
    }

    let store = Arc::new(ChoreStore::open(&config.db_path)?);
    store.seed(&config.seed, chrono::Utc::now())?;

    if config.scheduler.enabled {
        let dispatcher = Arc::new(Dispatcher::from_config(&config.smtp, &config.sms));
        NotificationScheduler::new(
            store.clone(),
            dispatcher,
            config.scheduler.interval_secs,
        )
        .spawn();
    } else {
        tracing::info!("Notification scheduler disabled");
    }

    let state = Arc::new(AppState::new(store));
    chorewheel_gateway::serve(state, &config.gateway.host, config.gateway.port).await
}
