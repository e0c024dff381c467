//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Ferry using clap.

pub mod commands;

use crate::config::{load_config_or_default, FerryConfig};
use crate::domain::{FerryError, Result};
use clap::{Parser, Subcommand};

/// Ferry - FHIR bulk transfer tool
#[derive(Parser, Debug)]
#[command(name = "ferry")]
#[command(version, about, long_about = None)]
#[command(author = "Ferry Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults to ferry.toml when present)
    #[arg(short, long, env = "FERRY_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FERRY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Override the FHIR server base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load configuration and apply the global overrides
    pub fn resolve_config(&self) -> Result<FerryConfig> {
        resolve_config(self.config.as_deref(), self.base_url.as_deref())
    }
}

/// Load configuration from `path` (or the default lookup) and apply a base URL override
pub fn resolve_config(path: Option<&str>, base_url: Option<&str>) -> Result<FerryConfig> {
    let mut config = load_config_or_default(path)?;

    if let Some(base_url) = base_url {
        config.server.base_url = base_url.to_string();
        config.validate().map_err(|e| {
            FerryError::Configuration(format!("Configuration validation failed: {e}"))
        })?;
    }

    Ok(config)
}

/// Exit code for a failed argument parse
///
/// `--help` and `--version` exit 0; usage errors such as a missing required
/// argument exit 1.
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        commands::EXIT_INPUT
    } else {
        commands::EXIT_OK
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a CSV of patients into FHIR Patient resources
    Convert(commands::convert::ConvertArgs),

    /// Upload JSON resources and bundles to the FHIR server
    Upload(commands::upload::UploadArgs),

    /// Delete every resource of one type from the FHIR server
    DeleteAll(commands::delete_all::DeleteAllArgs),

    /// Validate a resource with the server's $validate operation
    Validate(commands::validate::ValidateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate_config::ValidateConfigArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Whether the command runs against a loaded configuration
    pub fn needs_config(&self) -> bool {
        !matches!(self, Commands::ValidateConfig(_) | Commands::Init(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parse_upload_directory() {
        let cli = Cli::parse_from([
            "ferry",
            "upload",
            "--data-dir",
            "data",
            "--resource-type",
            "Patient",
        ]);
        assert!(cli.config.is_none());
        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.data_dir, Some(PathBuf::from("data")));
                assert_eq!(args.resource_type.as_deref(), Some("Patient"));
                assert!(args.file.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_upload_files_with_mode() {
        let cli = Cli::parse_from([
            "ferry", "upload", "--file", "a.json", "--file", "b.json", "--mode", "atomic",
        ]);
        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.file.len(), 2);
                assert_eq!(args.mode.as_deref(), Some("atomic"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_upload_requires_type_or_files() {
        assert!(Cli::try_parse_from(["ferry", "upload"]).is_err());
    }

    #[test]
    fn test_usage_errors_exit_with_input_code() {
        let err = Cli::try_parse_from(["ferry", "validate"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), commands::EXIT_INPUT);

        let err = Cli::try_parse_from(["ferry", "delete-all"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), commands::EXIT_INPUT);

        let err = Cli::try_parse_from(["ferry", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), commands::EXIT_OK);
    }

    #[test]
    fn test_resolve_config_applies_base_url_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ferry.toml");
        std::fs::write(&path, "[server]\nbase_url = \"http://localhost:8080/fhir\"\n").unwrap();
        let path = path.to_str().unwrap();

        let config = resolve_config(Some(path), Some("https://fhir.example.com/r4")).unwrap();
        assert_eq!(config.server.base_url, "https://fhir.example.com/r4");

        let err = resolve_config(Some(path), Some("ftp://fhir.example.com")).unwrap_err();
        assert!(matches!(err, FerryError::Configuration(_)));
    }

    #[test]
    fn test_cli_parse_delete_all() {
        let cli = Cli::parse_from(["ferry", "delete-all", "Observation", "--page-size", "100"]);
        match cli.command {
            Commands::DeleteAll(args) => {
                assert_eq!(args.resource_type, "Observation");
                assert_eq!(args.page_size, Some(100));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_convert() {
        let cli = Cli::parse_from([
            "ferry",
            "convert",
            "--input-csv",
            "patients.csv",
            "--output-dir",
            "out",
            "--upload-to-fhir",
        ]);
        match cli.command {
            Commands::Convert(args) => {
                assert!(args.upload_to_fhir);
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_global_overrides() {
        let cli = Cli::parse_from([
            "ferry",
            "--config",
            "custom.toml",
            "--log-level",
            "debug",
            "--base-url",
            "https://fhir.example.com/r4",
            "validate",
            "--file",
            "p.json",
        ]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.base_url.as_deref(), Some("https://fhir.example.com/r4"));
        assert!(cli.command.needs_config());
    }

    #[test]
    fn test_cli_parse_validate_config_and_init() {
        let cli = Cli::parse_from(["ferry", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
        assert!(!cli.command.needs_config());

        let cli = Cli::parse_from(["ferry", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
