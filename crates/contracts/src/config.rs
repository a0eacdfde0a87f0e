//! LoggerConfig - Config Loader output
//!
//! Describes the whole logger: timezone plus the optional console, log file
//! and email sinks, each with its own threshold.

use serde::{Deserialize, Serialize};

use crate::Level;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete logger configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// IANA timezone for record timestamps (None = UTC)
    #[serde(default)]
    pub timezone: Option<String>,

    /// Console (stderr) sink
    #[serde(default)]
    pub console: Option<ConsoleConfig>,

    /// Sandboxed log file sink
    #[serde(default)]
    pub log_file: Option<LogFileConfig>,

    /// Email alert sink
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

impl LoggerConfig {
    /// Number of sinks this configuration enables
    pub fn sink_count(&self) -> usize {
        usize::from(self.console.is_some())
            + usize::from(self.log_file.is_some())
            + usize::from(self.email.is_some())
    }
}

/// Console sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Minimum level written to stderr
    #[serde(default)]
    pub level: Level,
}

/// Log file sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogFileConfig {
    /// Minimum level written to the file
    #[serde(default)]
    pub level: Level,

    /// File name inside the executable's directory (no separators)
    pub filename: String,

    /// Make the file world-readable (0644 instead of 0600)
    #[serde(default)]
    pub allow_read: bool,

    /// Truncate on open instead of appending
    #[serde(default)]
    pub clear_on_restart: bool,
}

/// Email sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Minimum level that triggers an email
    #[serde(default = "default_email_level")]
    pub level: Level,

    /// SMTP relay host
    pub host: String,

    /// SMTP port
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    pub username: String,

    #[serde(default)]
    pub password: String,

    pub sender: String,

    pub recipient: String,
}

fn default_email_level() -> Level {
    Level::Error
}

fn default_smtp_port() -> u16 {
    587
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_toml() {
        let content = r#"
[console]

[log_file]
filename = "app.log"

[email]
host = "smtp.example.com"
username = "alerts"
sender = "alerts@example.com"
recipient = "oncall@example.com"
"#;
        let config: LoggerConfig = toml::from_str(content).unwrap();
        assert_eq!(config.version, ConfigVersion::V1);
        assert!(config.timezone.is_none());
        assert_eq!(config.console.unwrap().level, Level::Info);

        let file = config.log_file.unwrap();
        assert!(!file.allow_read);
        assert!(!file.clear_on_restart);

        let email = config.email.unwrap();
        assert_eq!(email.level, Level::Error);
        assert_eq!(email.port, 587);
        assert!(email.password.is_empty());
    }

    #[test]
    fn test_sink_count() {
        let mut config = LoggerConfig::default();
        assert_eq!(config.sink_count(), 0);
        config.console = Some(ConsoleConfig { level: Level::Debug });
        assert_eq!(config.sink_count(), 1);
    }
}
