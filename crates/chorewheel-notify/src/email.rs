//! SMTP email channel (async lettre).

use std::time::Duration;

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use chorewheel_core::config::SmtpConfig;

/// Bounded send timeout so a slow relay cannot stall a scheduler tick.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Email sender over a configured SMTP relay.
pub struct EmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailSender {
    /// Build from config. Returns `None` when no SMTP host is configured
    /// or the relay/from-address is unusable (logged, channel disabled).
    pub fn from_config(config: &SmtpConfig) -> Option<Self> {
        let host = config.host.as_deref()?;

        let from: Mailbox = match config.from.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                tracing::warn!("⚠️ Invalid SMTP from address '{}': {e}", config.from);
                return None;
            }
        };

        let builder = if config.use_tls {
            match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host) {
                Ok(builder) => builder,
                Err(e) => {
                    tracing::warn!("⚠️ SMTP STARTTLS setup failed for {host}: {e}");
                    return None;
                }
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };

        let mut builder = builder.port(config.port).timeout(Some(SEND_TIMEOUT));
        if let (Some(user), Some(password)) = (&config.user, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Some(Self { transport: builder.build(), from })
    }

    /// Send one plain-text email. Returns `true` on success; failures are
    /// logged and swallowed.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> bool {
        let to_mailbox: Mailbox = match to.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                tracing::warn!("⚠️ Invalid recipient address '{to}': {e}");
                return false;
            }
        };

        let message = match Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
        {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("⚠️ Failed to build email to {to}: {e}");
                return false;
            }
        };

        match self.transport.send(message).await {
            Ok(_) => {
                tracing::info!("📧 Email sent to {to}");
                true
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to send email to {to}: {e}");
                false
            }
        }
    }
}
