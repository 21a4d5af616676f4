mod config_commands;
mod console;

use std::path::{Path, PathBuf};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    rsvp_config::{RsvpConfig, apply_env_overrides, discover_and_load, load_config, validate},
    rsvp_router::MessageRouter,
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "rsvpbot", about = "rsvpbot: polls and RSVPs over chat", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to use instead of searching the standard locations.
    #[arg(long, global = true, env = "RSVPBOT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Zulip and serve commands (default when no subcommand is provided).
    Run,
    /// Talk to the bot on stdin without a chat server.
    Console {
        /// Channel name public messages appear in.
        #[arg(long, default_value = "console")]
        channel: String,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

/// Initialise tracing. Logs go to stderr so they don't mix with console
/// replies on stdout.
fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Load the explicit `--config` file, or discover one.
fn load(path: Option<&Path>) -> anyhow::Result<RsvpConfig> {
    let Some(path) = path else {
        return Ok(discover_and_load());
    };
    let mut config =
        load_config(path).with_context(|| format!("failed to load {}", path.display()))?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Log every diagnostic and refuse to start on errors.
fn ensure_valid(config: &RsvpConfig) -> anyhow::Result<()> {
    let result = validate::validate(config);
    for d in &result.diagnostics {
        warn!(path = %d.path, category = d.category, "{}", d.message);
    }
    if result.has_errors() {
        anyhow::bail!("invalid configuration; run `rsvpbot config check` for details");
    }
    Ok(())
}

async fn run_zulip(config: RsvpConfig) -> anyhow::Result<()> {
    let router = MessageRouter::from_config(&config);
    let (cancel, handle) = rsvp_zulip::start_polling(&config.zulip, router).await?;

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    cancel.cancel();
    handle.await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "rsvpbot starting");

    match cli.command {
        // Default: serve Zulip when no subcommand is provided
        None | Some(Commands::Run) => {
            let config = load(cli.config.as_deref())?;
            ensure_valid(&config)?;
            run_zulip(config).await
        },
        Some(Commands::Console { channel }) => {
            let config = load(cli.config.as_deref())?;
            ensure_valid(&config)?;
            console::run(MessageRouter::from_config(&config), &channel).await
        },
        Some(Commands::Config { action }) => {
            config_commands::handle_config(action, cli.config.as_deref())
        },
    }
}
