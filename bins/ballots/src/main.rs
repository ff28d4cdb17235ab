//! Ballots CLI and Server Binary
//!
//! Entry point for the polls API. Provides commands for initializing,
//! validating, and starting the server.

use anyhow::{Context, Result};
use cli::{Cli, Commands, StartArgs};
use config::{
    generate_default_config, load_config, load_config_or_default, normalize_mongo_uri,
    save_config, validate_config, BallotsConfig, ValidationReport,
};
use observability::{init_logging, LogFormat};
use polls::{create_router, create_store, AccessPolicy, PollsApiState};
use server::{HttpServer, ServerConfig, ServerExt};
use std::path::Path;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start(args) => start_server(args).await,
        Commands::Validate { config } => {
            init_logging("ballots", LogFormat::Pretty)?;
            info!("Executing 'validate' command");
            validate_command(config)
        }
        Commands::Init { output } => {
            init_logging("ballots", LogFormat::Pretty)?;
            info!("Executing 'init' command");
            init_command(output)
        }
    }
}

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut BallotsConfig, args: &StartArgs) -> Result<()> {
    if let Some(addr) = &args.addr {
        let listen = ServerConfig::parse_listen_addr(addr)
            .with_context(|| format!("Invalid --addr value: {}", addr))?;
        config.server.host = listen.host;
        config.server.port = listen.http_port;
    }
    if let Some(store) = args.store {
        config.store.backend = store.as_str().to_string();
    }
    if let Some(mongo) = &args.mongo {
        config.store.mongo.uri = normalize_mongo_uri(mongo);
    }
    if let Some(api_key) = &args.api_key {
        config.auth.api_key = api_key.clone();
    }
    if let Some(format) = args.log_format {
        config.logging.format = format.as_str().to_string();
    }
    Ok(())
}

fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }
    for err in &report.errors {
        error!("{}", err);
    }
}

async fn start_server(args: StartArgs) -> Result<()> {
    let config_missing = !args.config.exists();
    let mut config = load_config_or_default(&args.config)?;
    apply_overrides(&mut config, &args)?;

    // Logging needs the final format, so it starts after the config is read
    let format = LogFormat::parse(&config.logging.format)
        .with_context(|| format!("Unknown log format: {}", config.logging.format))?;
    init_logging("ballots", format)?;

    if config_missing {
        warn!(path = ?args.config, "Config file not found, using defaults");
    }
    debug!(server = ?config.server, "Effective listen configuration");

    let report = validate_config(&config);
    log_report(&report);
    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        anyhow::bail!("Cannot start server due to configuration errors");
    }

    let store = create_store(&config.store)
        .await
        .context("Failed to open poll store")?;

    let state = PollsApiState::new(store, AccessPolicy::new(config.auth.api_key.clone()));
    let router = create_router(state);

    let server_config = ServerConfig::http_only(config.server.host.clone(), config.server.port);
    info!(
        host = %server_config.host,
        port = server_config.http_port,
        backend = %config.store.backend,
        "Starting ballots"
    );

    HttpServer::new(server_config, router)
        .run_until_signalled()
        .await?;

    info!("Ballots stopped");
    Ok(())
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Listen: {}:{}", config.server.host, config.server.port);
    println!("Store: {}", config.store.backend);
    if config.store.is_mongo() {
        println!(
            "MongoDB: {} ({}.{})",
            config.store.mongo.uri, config.store.mongo.database, config.store.mongo.collection
        );
    }
    println!("Log format: {}", config.logging.format);

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Set BALLOTS_API_KEY (or edit auth.api_key)");
    println!(
        "  2. Run 'ballots validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'ballots start --config {:?}' to start the server",
        output_path
    );

    Ok(())
}
