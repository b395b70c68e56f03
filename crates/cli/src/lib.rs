pub mod commands;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use spendlens_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use tracing_subscriber::EnvFilter;

use crate::commands::{ChatArgs, CommandResult, ReportArgs};

#[derive(Debug, Parser)]
#[command(
    name = "spendlens",
    about = "Supplier spend analytics CLI",
    long_about = "Load supplier transactions, simulate cost shocks, and ask the supplier advisor.",
    after_help = "Examples:\n  spendlens report --input suppliers.csv --cost-shock 10\n  \
                  spendlens chat --input suppliers.csv \"Who should we renegotiate with?\"\n  \
                  spendlens config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a spendlens.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override logging.level (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compute KPIs, rankings, regional trend and supplier metrics for a scope")]
    Report(ReportArgs),
    #[command(about = "Ask the supplier advisor questions about the selected scope")]
    Chat(ChatArgs),
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.clone();

    let options = LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
        overrides: ConfigOverrides { log_level: cli.log_level, ..ConfigOverrides::default() },
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            let result = CommandResult::failure(
                "startup",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };

    if let Err(error) = init_logging(&config) {
        eprintln!("logging disabled: {error}");
    }

    let result = match cli.command {
        Command::Report(args) => commands::report::run(&config, &args),
        Command::Chat(args) => commands::chat::run(&config, &args, io::stdin().lock()),
        Command::Config => CommandResult {
            exit_code: 0,
            output: commands::config::run(config_path.as_deref()),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only command output.
fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.logging.level.trim()))
        .map_err(|error| anyhow!("invalid log level: {error}"))?;
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow!("could not install log subscriber: {error}"))
}
