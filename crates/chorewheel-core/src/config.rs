//! ChoreWheel configuration system.
//!
//! Everything is environment-driven so the service runs the same under
//! systemd, Docker, or a bare shell. `AppConfig::from_env()` reads the
//! whole set once at startup; the binary layers CLI overrides on top.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub seed: SeedConfig,
    pub smtp: SmtpConfig,
    pub sms: SmsConfig,
    pub scheduler: SchedulerConfig,
    pub gateway: GatewayConfig,
    pub db_path: PathBuf,
}

/// Initial participants and chores, inserted only when the store is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub participants: Vec<ParticipantSeed>,
    pub chores: Vec<ChoreSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantSeed {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoreSeed {
    pub name: String,
    pub frequency_days: i64,
}

/// SMTP transport settings. Email sending is disabled unless `host` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub use_tls: bool,
}

/// Twilio SMS settings. SMS sending is disabled unless all three are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Build the full configuration from the process environment.
    pub fn from_env() -> Self {
        let participants = vec![
            ParticipantSeed {
                name: env_or("PARTICIPANT1_NAME", "Alex"),
                email: env_opt("PARTICIPANT1_EMAIL"),
                phone: env_opt("PARTICIPANT1_PHONE"),
            },
            ParticipantSeed {
                name: env_or("PARTICIPANT2_NAME", "Sam"),
                email: env_opt("PARTICIPANT2_EMAIL"),
                phone: env_opt("PARTICIPANT2_PHONE"),
            },
        ];

        let chores = vec![
            ChoreSeed { name: "Dishes".into(), frequency_days: 1 },
            ChoreSeed { name: "Trash & Recycling".into(), frequency_days: 3 },
            ChoreSeed { name: "Room Tidy".into(), frequency_days: 3 },
        ];

        let smtp_user = env_opt("SMTP_USER");
        let smtp_from = env_opt("SMTP_FROM")
            .or_else(|| smtp_user.clone())
            .unwrap_or_else(|| "chorewheel@example.com".into());

        Self {
            seed: SeedConfig { participants, chores },
            smtp: SmtpConfig {
                host: env_opt("SMTP_HOST"),
                port: env_parse("SMTP_PORT", 587),
                user: smtp_user,
                password: env_opt("SMTP_PASSWORD"),
                from: smtp_from,
                use_tls: bool_env("SMTP_USE_TLS", true),
            },
            sms: SmsConfig {
                account_sid: env_opt("TWILIO_ACCOUNT_SID"),
                auth_token: env_opt("TWILIO_AUTH_TOKEN"),
                from_number: env_opt("TWILIO_FROM_NUMBER"),
            },
            scheduler: SchedulerConfig {
                enabled: bool_env("ENABLE_NOTIFICATIONS", true),
                interval_secs: env_parse("NOTIFY_INTERVAL_SECS", 60),
            },
            gateway: GatewayConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: env_parse("PORT", 8000),
            },
            db_path: PathBuf::from(env_or("CHOREWHEEL_DB", "data/chorewheel.db")),
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env_opt(name) {
        Some(value) => match value.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!("⚠️ Ignoring unparseable {name}={value}");
                default
            }
        },
        None => default,
    }
}

/// Boolean env parsing: `1`, `true`, `yes`, `on` (any case) are truthy.
pub fn bool_env(name: &str, default: bool) -> bool {
    match env_opt(name) {
        Some(value) => parse_bool(&value),
        None => default,
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_truthy_forms() {
        for v in ["1", "true", "TRUE", "yes", "On"] {
            assert!(parse_bool(v), "{v} should be truthy");
        }
        for v in ["0", "false", "no", "off", "banana", ""] {
            assert!(!parse_bool(v), "{v} should be falsy");
        }
    }

    #[test]
    fn test_bool_env_default_when_unset() {
        assert!(bool_env("CHOREWHEEL_TEST_UNSET_FLAG", true));
        assert!(!bool_env("CHOREWHEEL_TEST_UNSET_FLAG", false));
    }
}
