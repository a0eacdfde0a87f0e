//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use contracts::{Attr, Level, Value};

use crate::error::CliError;

/// multislog - fan-out structured logging to console, file and email
#[derive(Parser, Debug)]
#[command(
    name = "multislog",
    author,
    version,
    about = "Fan-out structured logging to console, a sandboxed file and email",
    long_about = "Builds a logger from a configuration file and emits records through it.\n\n\
                  Every record is fanned out to the console, a log file confined to the \n\
                  executable's directory, and email alerts, each with its own threshold."
)]
pub struct Cli {
    /// Increase diagnostic verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "MULTISLOG_VERBOSE")]
    pub verbose: u8,

    /// Only report diagnostic errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Diagnostic output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "MULTISLOG_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Emit one record through the configured sinks
    Emit(EmitArgs),

    /// Validate configuration file without opening any sink
    Validate(ValidateArgs),
}

/// Arguments for the `emit` command
#[derive(Parser, Debug, Clone)]
pub struct EmitArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "multislog.toml",
        env = "MULTISLOG_CONFIG"
    )]
    pub config: PathBuf,

    /// Record level
    #[arg(short, long, default_value = "info")]
    pub level: Level,

    /// Record message
    #[arg(short, long)]
    pub message: String,

    /// Attribute as key=value (repeatable)
    #[arg(short, long = "attr", value_parser = parse_attr)]
    pub attrs: Vec<Attr>,

    /// Override the SMTP password from configuration
    #[arg(long, env = "MULTISLOG_SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,

    /// Print per-sink counters and the teardown report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "multislog.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Diagnostic output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Parse `key=value`; integers, floats and booleans keep their type
pub fn parse_attr(input: &str) -> Result<Attr, CliError> {
    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| CliError::invalid_attribute(input, "expected key=value"))?;
    if key.is_empty() {
        return Err(CliError::invalid_attribute(input, "key must not be empty"));
    }

    let value = if let Ok(n) = raw.parse::<i64>() {
        Value::I64(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::F64(f)
    } else if let Ok(b) = raw.parse::<bool>() {
        Value::Bool(b)
    } else {
        Value::String(raw.to_string())
    };
    Ok(Attr::new(key, value))
}
