pub mod resend;
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{MailerConfig, Provider};
use crate::error::Result;

/// A mail transport: send one plain-text message to one recipient.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<()>;
}

/// Mailer facade. The transport is picked once at construction and never
/// re-evaluated; individual sends are independent and unordered.
#[derive(Clone)]
pub struct Mailer {
    inner: Arc<dyn MailTransport>,
    provider: &'static str,
}

impl Mailer {
    /// Build the mailer for whichever transport the configuration selects.
    pub fn new(config: &MailerConfig) -> Result<Self> {
        let inner: Arc<dyn MailTransport> = match &config.provider {
            Provider::Resend(_) => Arc::new(resend::ResendMailer::new(config)?),
            Provider::Smtp(_) => Arc::new(smtp::SmtpMailer::new(config)?),
        };
        let provider = config.provider.name();
        tracing::info!(provider, "mailer initialized");

        Ok(Self { inner, provider })
    }

    /// Create a mailer from the process environment (RESEND_API_KEY,
    /// SMTP_*, EMAIL_FROM).
    pub fn from_env() -> Result<Self> {
        Self::new(&MailerConfig::from_env()?)
    }

    /// Name of the transport selected at construction.
    pub fn provider(&self) -> &'static str {
        self.provider
    }

    pub async fn send(&self, to: &str, subject: &str, text: &str) -> Result<()> {
        self.inner.send(to, subject, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResendConfig, SmtpConfig};

    fn resend_config() -> MailerConfig {
        MailerConfig {
            provider: Provider::Resend(ResendConfig {
                api_key: "re_test123".to_string(),
            }),
            from: "no-reply@example.com".to_string(),
        }
    }

    fn smtp_config() -> MailerConfig {
        MailerConfig {
            provider: Provider::Smtp(SmtpConfig {
                host: "localhost".to_string(),
                port: 2500,
                secure: false,
                ignore_tls: true,
                auth: None,
            }),
            from: "no-reply@example.com".to_string(),
        }
    }

    #[test]
    fn test_resend_config_selects_resend_mailer() {
        let mailer = Mailer::new(&resend_config()).expect("Should build mailer");
        assert_eq!(mailer.provider(), "resend");
    }

    #[test]
    fn test_smtp_config_selects_smtp_mailer() {
        let mailer = Mailer::new(&smtp_config()).expect("Should build mailer");
        assert_eq!(mailer.provider(), "smtp");
    }

    #[test]
    fn test_empty_override_key_builds_smtp_mailer() {
        let overrides = crate::config::MailerOverrides {
            resend: Some(ResendConfig {
                api_key: String::new(),
            }),
            ..Default::default()
        };
        let config = MailerConfig::resolve(&std::collections::HashMap::new(), overrides)
            .expect("Should resolve config");

        let mailer = Mailer::new(&config).expect("Should build mailer");
        assert_eq!(mailer.provider(), "smtp");
    }

    #[test]
    fn test_mailer_is_cloneable() {
        let mailer = Mailer::new(&smtp_config()).expect("Should build mailer");
        let clone = mailer.clone();
        assert_eq!(clone.provider(), mailer.provider());
    }
}
