//! EmailSink - sends an alert email per admitted record

use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, instrument};

use contracts::{Attr, AttrContext, ContractError, Level, LogRecord, Sink};

use super::flatten_attrs;
use super::smtp::MailTransport;

const SUBJECT: &str = "Log Alert";

/// Sink that emails every record at or above its threshold.
///
/// Delivery blocks the calling thread for the duration of the send.
#[derive(Clone)]
pub struct EmailSink {
    name: String,
    level: Level,
    context: AttrContext,
    transport: Arc<dyn MailTransport>,
}

impl EmailSink {
    /// Create a new EmailSink
    pub fn new(level: Level, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            name: "email".to_string(),
            level,
            context: AttrContext::new(),
            transport,
        }
    }

    fn render_body(&self, record: &LogRecord) -> String {
        let mut attrs = String::new();
        for (key, value) in flatten_attrs(&self.context.resolve(record.attrs())) {
            let _ = write!(attrs, "{key}={value} ");
        }
        format!(
            "Level: {}\nTime: {}\nMessage: {}\nAttributes: {}",
            record.level(),
            record.rfc3339(),
            record.message(),
            attrs
        )
    }

    fn derived(&self, context: AttrContext) -> Arc<dyn Sink> {
        Arc::new(Self {
            context,
            ..self.clone()
        })
    }
}

impl Sink for EmailSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, level: Level) -> bool {
        self.level.admits(level)
    }

    #[instrument(name = "email_sink_handle", skip(self, record), fields(level = %record.level()))]
    fn handle(&self, record: &LogRecord) -> Result<(), ContractError> {
        if !self.level.admits(record.level()) {
            return Ok(());
        }
        let body = self.render_body(record);
        self.transport.send(SUBJECT, &body)?;
        debug!(sink = %self.name, "Alert email sent");
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        self.derived(self.context.with_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        self.derived(self.context.with_group(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;
    use contracts::attr;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct MockTransport {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl MailTransport for MockTransport {
        fn send(&self, subject: &str, body: &str) -> Result<(), ContractError> {
            if self.fail {
                return Err(ContractError::sink_delivery("email", "smtp failure"));
            }
            self.sent.lock().push((subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn record() -> LogRecord {
        let t = Tz::UTC.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        LogRecord::at(Level::Error, "db down", t).with_attr("retries", 3)
    }

    #[test]
    fn test_email_body() {
        let transport = Arc::new(MockTransport::default());
        let sink = EmailSink::new(Level::Warn, transport.clone());

        sink.handle(&record()).unwrap();

        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "Log Alert");
        assert_eq!(
            sent[0].1,
            "Level: ERROR\nTime: 2024-05-01T08:00:00.000Z\nMessage: db down\nAttributes: retries=3 "
        );
    }

    #[test]
    fn test_below_threshold_not_sent() {
        let transport = Arc::new(MockTransport::default());
        let sink = EmailSink::new(Level::Error, transport.clone());

        assert!(!sink.enabled(Level::Warn));
        sink.handle(&LogRecord::new(Level::Warn, "meh")).unwrap();
        assert!(transport.sent.lock().is_empty());
    }

    #[test]
    fn test_derived_carries_context() {
        let transport = Arc::new(MockTransport::default());
        let sink =
            EmailSink::new(Level::Info, transport.clone()).with_attrs(&[attr("host", "db1")]);

        sink.handle(&record()).unwrap();
        assert!(transport.sent.lock()[0].1.ends_with("Attributes: host=db1 retries=3 "));
    }

    #[test]
    fn test_delivery_failure_surfaces_to_dispatcher() {
        let transport = Arc::new(MockTransport {
            fail: true,
            ..MockTransport::default()
        });
        let sink = EmailSink::new(Level::Info, transport);
        let err = sink.handle(&record()).unwrap_err();
        assert!(matches!(err, ContractError::SinkDelivery { .. }));
    }
}
