//! `validate` command implementation.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::info;

use contracts::LoggerConfig;

use super::load_config;
use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    timezone: String,
    sink_count: usize,
    console_level: Option<String>,
    log_file: Option<String>,
    email_level: Option<String>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    let checked = load_config(&args.config).map_err(|e| e.to_string()).and_then(|config| {
        check_timezone(&config)?;
        Ok(config)
    });

    match checked {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(summarize(&config)),
            }
        }
        Err(error) => ValidationResult {
            valid: false,
            config_path,
            error: Some(error),
            warnings: None,
            summary: None,
        },
    }
}

/// The loader only checks the name is present; the zone database decides
fn check_timezone(config: &LoggerConfig) -> std::result::Result<(), String> {
    match config.timezone.as_deref() {
        Some(name) => name
            .parse::<Tz>()
            .map(|_| ())
            .map_err(|e| format!("unknown timezone '{name}': {e}")),
        None => Ok(()),
    }
}

fn summarize(config: &LoggerConfig) -> ConfigSummary {
    ConfigSummary {
        version: format!("{:?}", config.version),
        timezone: config.timezone.clone().unwrap_or_else(|| "UTC".to_string()),
        sink_count: config.sink_count(),
        console_level: config.console.as_ref().map(|c| c.level.to_string()),
        log_file: config
            .log_file
            .as_ref()
            .map(|f| format!("{} ({})", f.filename, f.level)),
        email_level: config.email.as_ref().map(|e| e.level.to_string()),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &LoggerConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.sink_count() == 0 {
        warnings.push("No sinks configured - records will be dropped".to_string());
    }

    if let Some(file) = &config.log_file {
        if file.allow_read {
            warnings.push(format!("log_file '{}' will be world-readable (0644)", file.filename));
        }
    }

    if let Some(email) = &config.email {
        if !email.username.is_empty() && email.password.is_empty() {
            warnings.push(
                "email.password is empty - set MULTISLOG_SMTP_PASSWORD before emitting".to_string(),
            );
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Timezone: {}", summary.timezone);
            println!("  Sinks: {}", summary.sink_count);
            if let Some(ref level) = summary.console_level {
                println!("  Console: {}", level);
            }
            if let Some(ref file) = summary.log_file {
                println!("  Log file: {}", file);
            }
            if let Some(ref level) = summary.email_level {
                println!("  Email: {}", level);
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
