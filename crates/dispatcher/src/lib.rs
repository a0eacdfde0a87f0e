//! # Dispatcher
//!
//! 日志分发模块。
//!
//! 负责：
//! - 将 `LogRecord` fan-out 到多个 sinks，按各自阈值过滤
//! - 时区统一：分发前只改写一次时间戳
//! - 隔离失败/panic 的 sink，不影响其他 sink 与调用方
//! - 生命周期管理：按顺序关闭 sinks，最后关闭日志文件

pub mod dispatcher;
pub mod error;
pub mod lifecycle;
pub mod metrics;
pub mod sinks;

#[cfg(test)]
mod test_support;

pub use contracts::{LogRecord, Sink};
pub use dispatcher::Dispatcher;
pub use error::DispatcherError;
pub use lifecycle::{Lifecycle, LogFileWriter, ManagedFile, TeardownReport};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{ConsoleSink, EmailSettings, EmailSink, FileSink, MailTransport, SmtpMailer};
