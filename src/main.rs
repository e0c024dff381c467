// Ferry - FHIR bulk transfer tool
// Copyright (c) 2025 Ferry Contributors
// Licensed under the MIT License

use clap::Parser;
use ferry::cli::{usage_exit_code, Cli, Commands};
use ferry::config::{FerryConfig, LoggingConfig};
use ferry::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(usage_exit_code(&e));
        }
    };

    let config = if cli.command.needs_config() {
        match cli.resolve_config() {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ {e}");
                process::exit(2);
            }
        }
    } else {
        None
    };

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(LoggingConfig::default);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Ferry - FHIR bulk transfer tool"
    );
    if let (Some(base_url), Some(_)) = (&cli.base_url, &config) {
        tracing::info!(base_url = %base_url, "Overriding FHIR base URL from CLI");
    }

    let exit_code = match execute_command(&cli, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            1
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config: Option<FerryConfig>) -> anyhow::Result<i32> {
    let config_path = cli.config.as_deref();
    let base_url = cli.base_url.as_deref();

    match (&cli.command, config) {
        (Commands::Init(args), _) => args.execute(),
        (Commands::ValidateConfig(args), _) => args.execute(config_path, base_url),
        (Commands::Convert(args), Some(config)) => args.execute(&config).await,
        (Commands::Upload(args), Some(config)) => args.execute(&config).await,
        (Commands::DeleteAll(args), Some(config)) => args.execute(&config).await,
        (Commands::Validate(args), Some(config)) => args.execute(&config).await,
        (_, None) => anyhow::bail!("configuration was not loaded"),
    }
}
