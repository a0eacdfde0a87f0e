//! 配置编解码模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式，两个方向共用同一个格式枚举。

use contracts::{ContractError, LoggerConfig};
use std::path::Path;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式（大小写不敏感）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// 从文件路径推断格式
    pub fn from_path(path: &Path) -> Result<Self, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;
        Self::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    /// 文本 -> `LoggerConfig`，不做语义校验
    pub fn decode(self, content: &str) -> Result<LoggerConfig, ContractError> {
        let decoded = match self {
            Self::Toml => toml::from_str(content).map_err(|e| Box::new(e) as BoxError),
            Self::Json => serde_json::from_str(content).map_err(|e| Box::new(e) as BoxError),
        };
        decoded.map_err(|e| ContractError::ConfigParse {
            message: format!("{} parse error: {e}", self.name()),
            source: Some(e),
        })
    }

    /// `LoggerConfig` -> 文本（pretty 输出）
    pub fn encode(self, config: &LoggerConfig) -> Result<String, ContractError> {
        let encoded = match self {
            Self::Toml => toml::to_string_pretty(config).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(config).map_err(|e| e.to_string()),
        };
        encoded.map_err(|e| {
            ContractError::config_parse(format!("{} serialize error: {e}", self.name()))
        })
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;
