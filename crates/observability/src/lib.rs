//! # Observability
//!
//! 可观测性模块：进程级 Tracing 初始化。
//!
//! ## 功能
//!
//! - Tracing 初始化 (JSON/Pretty/Compact 格式)，输出到 stderr
//! - 支持 RUST_LOG 环境变量
//! - multislog 自身诊断 (`multislog::diagnostic`) 默认保留在 warn 级别
//!
//! ## 使用示例
//!
//! ```ignore
//! // 初始化
//! observability::init()?;
//!
//! // 之后 sink 失败、关闭失败等诊断会出现在 stderr
//! ```

use anyhow::{Context, Result};
use contracts::DIAGNOSTIC_TARGET;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 初始化 Tracing (默认配置)
///
/// - JSON 格式，写到 stderr
/// - 默认级别 warn，支持 RUST_LOG 覆盖
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

/// 可观测性配置
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// 日志格式
    pub log_format: LogFormat,
    /// 默认日志级别
    pub default_log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            default_log_level: "warn".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// 按 CLI 的 -v / -q 选择默认级别
    pub fn with_verbosity(mut self, verbose: u8, quiet: bool) -> Self {
        self.default_log_level = if quiet {
            "error"
        } else {
            match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
        .to_string();
        self
    }

    pub fn with_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON 结构化日志
    #[default]
    Json,
    /// 人类可读格式
    Pretty,
    /// 紧凑单行格式
    Compact,
}

/// 构造过滤器：RUST_LOG 优先，否则使用默认级别并保留诊断目标
fn build_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},{}=warn",
            config.default_log_level, DIAGNOSTIC_TARGET
        ))
    })
}

/// 使用自定义配置初始化
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = build_filter(&config);

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        log_format = ?config.log_format,
        default_log_level = %config.default_log_level,
        "Observability initialized"
    );

    Ok(())
}
