//! # ChoreWheel Notify
//!
//! Outbound reminder dispatch. Email is preferred when the participant
//! has an address on file; SMS (Twilio) is the fallback. No channel
//! configured, or every send failing, is an accepted degraded state:
//! nothing propagates to the caller, everything lands in the logs.

pub mod email;
pub mod sms;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use chorewheel_core::config::{SmsConfig, SmtpConfig};
use chorewheel_core::traits::Notify;
use chorewheel_core::types::Participant;

pub use email::EmailSender;
pub use sms::SmsSender;

/// Routes a due-chore reminder to the best available channel.
pub struct Dispatcher {
    email: Option<EmailSender>,
    sms: Option<SmsSender>,
}

impl Dispatcher {
    /// Build from config; unconfigured channels stay disabled.
    pub fn from_config(smtp: &SmtpConfig, sms: &SmsConfig) -> Self {
        let email = EmailSender::from_config(smtp);
        let sms = SmsSender::from_config(sms);
        tracing::info!(
            "📣 Dispatcher ready (email: {}, sms: {})",
            if email.is_some() { "on" } else { "off" },
            if sms.is_some() { "on" } else { "off" },
        );
        Self { email, sms }
    }

    /// Dispatcher with no channels, for tests and dry runs.
    pub fn disabled() -> Self {
        Self { email: None, sms: None }
    }

    fn subject(chore_name: &str) -> String {
        format!("Chore due: {chore_name}")
    }

    fn body(participant: &Participant, chore_name: &str, due_date: DateTime<Utc>) -> String {
        format!(
            "Hi {},\n\nIt's your turn to handle '{}'. The chore is due now \
             (scheduled for {}).",
            participant.name,
            chore_name,
            due_date.to_rfc3339(),
        )
    }
}

#[async_trait]
impl Notify for Dispatcher {
    async fn notify(&self, participant: &Participant, chore_name: &str, due_date: DateTime<Utc>) {
        let subject = Self::subject(chore_name);
        let body = Self::body(participant, chore_name, due_date);

        let mut sent = false;
        if let (Some(email), Some(address)) = (&self.email, &participant.email) {
            sent = email.send(address, &subject, &body).await;
        }
        if !sent {
            if let (Some(sms), Some(number)) = (&self.sms, &participant.phone) {
                sent = sms.send(number, &body).await;
            }
        }
        if !sent {
            tracing::info!(
                "📭 No notification delivered for '{}' to {} (no channel or all sends failed)",
                chore_name,
                participant.name,
            );
        }
    }
}
