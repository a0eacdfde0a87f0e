//! SMTP transport used by the email sink

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, instrument};

use contracts::{ContractError, EmailConfig};

use crate::error::DispatcherError;

/// Connection and addressing settings for email alerts
#[derive(Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
    pub recipient: String,
}

impl std::fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl From<&EmailConfig> for EmailSettings {
    fn from(config: &EmailConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            username: config.username.clone(),
            password: config.password.clone(),
            sender: config.sender.clone(),
            recipient: config.recipient.clone(),
        }
    }
}

/// Delivers one message to the configured recipient
pub trait MailTransport: Send + Sync {
    /// # Errors
    /// Returns delivery error from the underlying transport
    fn send(&self, subject: &str, body: &str) -> Result<(), ContractError>;
}

/// Blocking SMTP client (STARTTLS relay, plain credentials)
pub struct SmtpMailer {
    transport: SmtpTransport,
    sender: Mailbox,
    recipient: Mailbox,
}

impl SmtpMailer {
    /// Build the transport. No connection is made until the first send.
    ///
    /// # Errors
    /// Invalid sender/recipient address or relay host
    #[instrument(
        name = "smtp_mailer_new",
        skip(settings),
        fields(host = %settings.host, port = settings.port)
    )]
    pub fn new(settings: &EmailSettings) -> Result<Self, DispatcherError> {
        let sender: Mailbox = settings
            .sender
            .parse()
            .map_err(|e| DispatcherError::sink_creation("email", format!("invalid sender: {e}")))?;
        let recipient: Mailbox = settings.recipient.parse().map_err(|e| {
            DispatcherError::sink_creation("email", format!("invalid recipient: {e}"))
        })?;

        let mut builder = SmtpTransport::starttls_relay(&settings.host)
            .map_err(|e| DispatcherError::sink_creation("email", format!("invalid relay: {e}")))?
            .port(settings.port);
        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        debug!("SMTP transport configured");
        Ok(Self {
            transport: builder.build(),
            sender,
            recipient,
        })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, subject: &str, body: &str) -> Result<(), ContractError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| ContractError::sink_delivery("email", format!("build message: {e}")))?;

        self.transport.send(&message).map(|_| ()).map_err(|e| {
            ContractError::sink_delivery("email", format!("SMTP client couldn't send mail: {e}"))
        })
    }
}
