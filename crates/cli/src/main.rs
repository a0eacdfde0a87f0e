//! # multislog CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 通过配置的 sinks 发送单条日志
//! - 关闭时输出每个 sink 的统计

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_emit, run_validate};
use observability::ObservabilityConfig;

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(
        ObservabilityConfig::default()
            .with_format(cli.log_format.into())
            .with_verbosity(cli.verbose, cli.quiet),
    )?;

    info!(version = env!("CARGO_PKG_VERSION"), "multislog CLI starting");

    let result = match &cli.command {
        Commands::Emit(args) => run_emit(args),
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}
