//! `emit` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use multislog::{MetricsSnapshot, Multislog, TeardownReport};

use super::load_config;
use crate::cli::EmitArgs;

#[derive(Serialize)]
struct EmitReport {
    log_file: Option<String>,
    sinks: Vec<SinkReport>,
    teardown: TeardownReport,
}

#[derive(Serialize)]
struct SinkReport {
    name: String,
    #[serde(flatten)]
    metrics: MetricsSnapshot,
}

/// Execute the `emit` command
pub fn run_emit(args: &EmitArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    if let (Some(email), Some(password)) = (config.email.as_mut(), &args.smtp_password) {
        debug!("Using SMTP password from environment/flag");
        email.password = password.clone();
    }

    let mut log = Multislog::from_config(&config).map_err(crate::error::CliError::from)?;
    info!(
        config = %args.config.display(),
        sinks = log.dispatcher().len(),
        "Logger ready"
    );

    log.logger().log(args.level, args.message.clone(), &args.attrs);

    let sinks = log
        .metrics()
        .into_iter()
        .map(|(name, metrics)| SinkReport { name, metrics })
        .collect();
    let log_file = log.log_file_path().map(|p| p.display().to_string());
    let teardown = log.close();

    let report = EmitReport {
        log_file,
        sinks,
        teardown,
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize emit report")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    let failures: u64 = report.sinks.iter().map(|s| s.metrics.failure_count).sum();
    if failures > 0 {
        anyhow::bail!("{failures} sink(s) failed to handle the record");
    }
    Ok(())
}

fn print_report(report: &EmitReport) {
    if let Some(ref path) = report.log_file {
        println!("Log file: {}", path);
    }
    for sink in &report.sinks {
        let outcome = if sink.metrics.failure_count > 0 {
            "failed"
        } else if sink.metrics.handled_count > 0 {
            "delivered"
        } else {
            "below threshold"
        };
        println!("  {:<10} {}", sink.name, outcome);
    }
}
