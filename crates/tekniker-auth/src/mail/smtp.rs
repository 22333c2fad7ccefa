//! SMTP mailer built on lettre.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::{Header, HeaderName, HeaderValue};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use tekniker_core::config::smtp::SmtpConfig;
use tekniker_core::error::{AppError, ErrorKind};
use tekniker_core::messages;
use tekniker_core::result::AppResult;
use tekniker_core::traits::mailer::Mailer;

use super::template::AuthCodeEmail;

/// `List-Unsubscribe` header.
#[derive(Debug, Clone)]
struct ListUnsubscribe(String);

impl Header for ListUnsubscribe {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("List-Unsubscribe")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

/// Sends login codes through a plain SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    /// Sender mailbox (display name and address).
    from: Mailbox,
    /// Async SMTP transport.
    transport: AsyncSmtpTransport<Tokio1Executor>,
    /// Relay host, kept for logging.
    server: String,
    /// `List-Unsubscribe` value, if any.
    list_unsubscribe: Option<String>,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .field("server", &self.server)
            .finish()
    }
}

impl SmtpMailer {
    /// Build a mailer from configuration.
    ///
    /// The relay is internal and spoken to without TLS.
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let address: Address = config.from.parse().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid smtp.from address '{}'", config.from),
                e,
            )
        })?;

        let name = (!config.from_name.is_empty()).then(|| config.from_name.clone());
        let from = Mailbox::new(name, address);

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        info!(server = %config.server, port = config.port, "SMTP mailer configured");

        Ok(Self {
            from,
            transport: builder.build(),
            server: config.server.clone(),
            list_unsubscribe: Some(config.list_unsubscribe.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        })
    }

    fn build_message(&self, recipient: &str, email: AuthCodeEmail) -> AppResult<Message> {
        let to: Address = recipient.trim().parse().map_err(|e| {
            AppError::with_source(ErrorKind::Validation, messages::EMAIL_NOT_APPROVED, e)
        })?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(None, to))
            .subject(email.subject)
            .user_agent("CP-Tekniker".to_string());
        if let Some(value) = &self.list_unsubscribe {
            builder = builder.header(ListUnsubscribe(value.clone()));
        }

        builder
            .multipart(MultiPart::alternative_plain_html(email.text, email.html))
            .map_err(|e| AppError::with_source(ErrorKind::Mail, messages::CODE_SEND_FAILED, e))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_auth_code(&self, recipient: &str, code: &str, valid_minutes: u64) -> AppResult<()> {
        let message = self.build_message(recipient, AuthCodeEmail::render(code, valid_minutes))?;

        self.transport.send(message).await.map_err(|e| {
            error!(server = %self.server, error = %e, "SMTP delivery failed");
            AppError::with_source(ErrorKind::Mail, messages::CODE_SEND_FAILED, e)
        })?;

        info!(server = %self.server, "Login code mail sent");
        Ok(())
    }
}
