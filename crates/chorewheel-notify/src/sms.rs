//! Twilio SMS channel.

use std::time::Duration;

use chorewheel_core::config::SmsConfig;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// SMS sender via the Twilio Messages API.
pub struct SmsSender {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl SmsSender {
    /// Build from config. Returns `None` unless account sid, auth token,
    /// and from-number are all configured.
    pub fn from_config(config: &SmsConfig) -> Option<Self> {
        Some(Self {
            client: reqwest::Client::new(),
            account_sid: config.account_sid.clone()?,
            auth_token: config.auth_token.clone()?,
            from_number: config.from_number.clone()?,
        })
    }

    /// Send one SMS. Returns `true` on a 2xx response; failures are
    /// logged and swallowed.
    pub async fn send(&self, to: &str, body: &str) -> bool {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );

        let result = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .timeout(SEND_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!("📱 SMS sent to {to}");
                true
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                let preview: String = body.chars().take(200).collect();
                tracing::warn!("⚠️ Twilio API error {status}: {preview}");
                false
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to send SMS to {to}: {e}");
                false
            }
        }
    }
}
