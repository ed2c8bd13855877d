//! Storefront settings - Application entry point
//!
//! Loads the settings once, installs them for the process and dispatches to
//! the requested command. Any configuration defect stops the process here.

use clap::Parser;
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

use storefront::{
    cli::{Cli, Commands},
    commands,
    config::{global, load_dotenv, Settings},
    errors::AppResult,
};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing; the filter is replaced once settings are loaded
    let filter = init_tracing(cli.verbose);

    // Load configuration, failing fast on missing or malformed values
    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(code = e.code(), "Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG may come from the env file
    if let Err(e) = filter.reload(EnvFilter::new(settings.log_filter(cli.verbose))) {
        tracing::warn!("Failed to apply log level: {}", e);
    }
    tracing::debug!(profile = %settings.profile, "Configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args, settings).await,
        Commands::Show(args) => commands::show::execute(args, settings),
        Commands::Host(args) => commands::host::execute(args, settings),
    };

    // Handle errors
    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

fn load_settings(cli: &Cli) -> AppResult<&'static Settings> {
    if let Some(path) = &cli.env_file {
        load_dotenv(Some(path.as_path()))?;
    }
    global::init_from_env()
}

/// Initialize tracing subscriber with a reloadable filter
fn init_tracing(verbose: bool) -> FilterHandle {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };
    let (filter, handle) = reload::Layer::new(EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    handle
}
