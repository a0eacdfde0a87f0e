//! MultislogBuilder - ordered construction options

use chrono_tz::Tz;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, instrument};

use contracts::{Level, LoggerConfig, Sink};
use dispatcher::{
    ConsoleSink, Dispatcher, EmailSettings, EmailSink, FileSink, Lifecycle, MailTransport,
    ManagedFile, SmtpMailer,
};
use sandbox::{SandboxConfig, SandboxResolver};

use crate::error::MultislogError;
use crate::Multislog;

enum LogOption {
    Timezone(String),
    Console {
        level: Level,
        writer: Option<Box<dyn Write + Send>>,
    },
    LogFile {
        level: Level,
        base_dir: Option<PathBuf>,
        config: SandboxConfig,
    },
    Email {
        level: Level,
        settings: EmailSettings,
    },
    EmailTransport {
        level: Level,
        transport: Arc<dyn MailTransport>,
    },
    Sink(Arc<dyn Sink>),
}

/// Collects options and applies them, in call order, on [`build`](Self::build)
#[derive(Default)]
pub struct MultislogBuilder {
    options: Vec<LogOption>,
}

/// Resources acquired so far; dropping it releases them
struct Assembly {
    dispatcher: Dispatcher,
    lifecycle: Lifecycle,
    log_file_path: Option<PathBuf>,
}

impl MultislogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-filled from a loaded configuration
    pub fn from_config(config: &LoggerConfig) -> Self {
        let mut builder = Self::new();
        if let Some(tz) = &config.timezone {
            builder = builder.timezone(tz);
        }
        if let Some(console) = &config.console {
            builder = builder.console(console.level);
        }
        if let Some(file) = &config.log_file {
            builder = builder.log_file(
                file.level,
                &file.filename,
                file.allow_read,
                file.clear_on_restart,
            );
        }
        if let Some(email) = &config.email {
            builder = builder.email(email.level, EmailSettings::from(email));
        }
        builder
    }

    /// Normalize record timestamps into an IANA timezone
    pub fn timezone(mut self, name: impl Into<String>) -> Self {
        self.options.push(LogOption::Timezone(name.into()));
        self
    }

    /// Console sink on stderr
    pub fn console(mut self, level: Level) -> Self {
        self.options.push(LogOption::Console { level, writer: None });
        self
    }

    /// Console-format sink on any writer
    pub fn console_writer(mut self, level: Level, writer: impl Write + Send + 'static) -> Self {
        self.options.push(LogOption::Console {
            level,
            writer: Some(Box::new(writer)),
        });
        self
    }

    /// JSON log file directly inside the executable's directory
    pub fn log_file(
        mut self,
        level: Level,
        filename: impl Into<String>,
        allow_read: bool,
        clear_on_restart: bool,
    ) -> Self {
        self.options.push(LogOption::LogFile {
            level,
            base_dir: None,
            config: SandboxConfig::new(filename, allow_read, clear_on_restart),
        });
        self
    }

    /// JSON log file directly inside `base_dir`
    pub fn log_file_in(
        mut self,
        base_dir: impl Into<PathBuf>,
        level: Level,
        filename: impl Into<String>,
        allow_read: bool,
        clear_on_restart: bool,
    ) -> Self {
        self.options.push(LogOption::LogFile {
            level,
            base_dir: Some(base_dir.into()),
            config: SandboxConfig::new(filename, allow_read, clear_on_restart),
        });
        self
    }

    /// Email alerts over SMTP
    pub fn email(mut self, level: Level, settings: EmailSettings) -> Self {
        self.options.push(LogOption::Email { level, settings });
        self
    }

    /// Email alerts over a caller-supplied transport
    pub fn email_with_transport(mut self, level: Level, transport: Arc<dyn MailTransport>) -> Self {
        self.options
            .push(LogOption::EmailTransport { level, transport });
        self
    }

    /// Custom sink; it is closed on teardown like the built-in ones
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.options.push(LogOption::Sink(sink));
        self
    }

    /// Apply every option in order.
    ///
    /// # Errors
    /// The first failing option aborts construction; sinks and the file
    /// opened before it are closed.
    #[instrument(name = "multislog_build", skip(self), fields(options = self.options.len()))]
    pub fn build(self) -> Result<Multislog, MultislogError> {
        let mut assembly = Assembly {
            dispatcher: Dispatcher::default(),
            lifecycle: Lifecycle::new(),
            log_file_path: None,
        };

        for option in self.options {
            assembly.apply(option)?;
        }

        debug!(
            sinks = assembly.dispatcher.len(),
            timezone = %assembly.dispatcher.timezone(),
            "Multislog built"
        );
        Ok(Multislog::from_parts(
            assembly.dispatcher,
            assembly.lifecycle,
            assembly.log_file_path,
        ))
    }
}

impl Assembly {
    fn apply(&mut self, option: LogOption) -> Result<(), MultislogError> {
        match option {
            LogOption::Timezone(name) => {
                let tz: Tz = name
                    .parse()
                    .map_err(|e| MultislogError::invalid_timezone(&name, format!("{e}")))?;
                self.dispatcher = std::mem::take(&mut self.dispatcher).with_timezone(tz);
            }
            LogOption::Console { level, writer } => {
                let sink = match writer {
                    Some(writer) => ConsoleSink::with_writer(level, writer),
                    None => ConsoleSink::new(level),
                };
                self.add_sink(Arc::new(sink));
            }
            LogOption::LogFile {
                level,
                base_dir,
                config,
            } => self.open_log_file(level, base_dir, &config)?,
            LogOption::Email { level, settings } => {
                let mailer = SmtpMailer::new(&settings).map_err(MultislogError::Email)?;
                self.add_sink(Arc::new(EmailSink::new(level, Arc::new(mailer))));
            }
            LogOption::EmailTransport { level, transport } => {
                self.add_sink(Arc::new(EmailSink::new(level, transport)));
            }
            LogOption::Sink(sink) => self.add_sink(sink),
        }
        Ok(())
    }

    fn add_sink(&mut self, sink: Arc<dyn Sink>) {
        self.lifecycle.register_sink(Arc::clone(&sink));
        self.dispatcher.push(sink);
    }

    fn open_log_file(
        &mut self,
        level: Level,
        base_dir: Option<PathBuf>,
        config: &SandboxConfig,
    ) -> Result<(), MultislogError> {
        // Checked before opening so a second file is never truncated
        if let Some(existing) = &self.log_file_path {
            return Err(MultislogError::LogFileAlreadyEnabled {
                path: existing.display().to_string(),
            });
        }

        let resolver = match base_dir {
            Some(dir) => SandboxResolver::with_base_dir(dir),
            None => SandboxResolver::for_current_exe(),
        };
        let opened = resolver.open(config)?;
        let managed = ManagedFile::new(opened.file, opened.path.clone());
        let sink = Arc::new(FileSink::new(level, managed.writer()));

        self.lifecycle
            .adopt_file(managed)
            .map_err(|_| MultislogError::LogFileAlreadyEnabled {
                path: opened.path.display().to_string(),
            })?;
        self.log_file_path = Some(opened.path);
        self.add_sink(sink);
        Ok(())
    }
}
