use std::collections::HashMap;
use std::env;

use crate::error::{Error, Result};

/// Sender address used when EMAIL_FROM is not set.
pub const DEFAULT_FROM: &str = "no-reply@resend.devlab.io";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpAuth {
    pub user: String,
    pub pass: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub ignore_tls: bool,
    pub auth: Option<SmtpAuth>,
}

/// The transport a mailer will use. Exactly one variant is ever populated;
/// resolution never produces a configuration carrying both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    Resend(ResendConfig),
    Smtp(SmtpConfig),
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Resend(_) => "resend",
            Provider::Smtp(_) => "smtp",
        }
    }
}

/// Resolved mailer configuration: one transport plus the sender address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailerConfig {
    pub provider: Provider,
    pub from: String,
}

/// Programmatic overrides applied on top of environment-derived values.
/// Each block replaces its environment counterpart wholesale; `from` wins
/// field-by-field over the environment default.
#[derive(Debug, Clone, Default)]
pub struct MailerOverrides {
    pub resend: Option<ResendConfig>,
    pub smtp: Option<SmtpConfig>,
    pub from: Option<String>,
}

/// Coerce an environment string into a boolean. Case-insensitive
/// true/yes/1 and false/no/0; anything else (including empty) is false.
/// Absent variables never reach this function, the schema default applies.
fn parse_bool(raw: &str) -> bool {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => true,
        "false" | "no" | "0" => false,
        _ => false,
    }
}

/// Environment variables after schema validation, defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EnvSettings {
    resend_api_key: Option<String>,
    smtp_host: String,
    smtp_port: String,
    smtp_secure: bool,
    smtp_ignore_tls: bool,
    smtp_user: Option<String>,
    smtp_pass: Option<String>,
    email_from: String,
}

impl EnvSettings {
    fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let email_from = match vars.get("EMAIL_FROM") {
            Some(v) if v.is_empty() => {
                return Err(Error::InvalidConfig(
                    "EMAIL_FROM must not be empty".to_string(),
                ))
            }
            Some(v) => v.clone(),
            None => DEFAULT_FROM.to_string(),
        };

        Ok(EnvSettings {
            resend_api_key: vars.get("RESEND_API_KEY").cloned(),
            smtp_host: vars
                .get("SMTP_HOST")
                .cloned()
                .unwrap_or_else(|| "localhost".to_string()),
            smtp_port: vars
                .get("SMTP_PORT")
                .cloned()
                .unwrap_or_else(|| "2500".to_string()),
            smtp_secure: vars.get("SMTP_SECURE").map_or(false, |v| parse_bool(v)),
            smtp_ignore_tls: vars.get("SMTP_IGNORE_TLS").map_or(true, |v| parse_bool(v)),
            smtp_user: vars.get("SMTP_USER").cloned(),
            smtp_pass: vars.get("SMTP_PASS").cloned(),
            email_from,
        })
    }

    /// Pick the transport the environment describes: a non-empty Resend API
    /// key wins, otherwise the SMTP block. The port is only parsed on the
    /// SMTP branch, so a bad SMTP_PORT never blocks a Resend setup.
    fn provider(&self) -> Result<Provider> {
        if let Some(key) = &self.resend_api_key {
            if !key.is_empty() {
                return Ok(Provider::Resend(ResendConfig {
                    api_key: key.clone(),
                }));
            }
        }

        let port: u16 = self.smtp_port.parse().map_err(|_| {
            Error::InvalidConfig(format!("SMTP_PORT is not a valid port: {}", self.smtp_port))
        })?;

        let auth = match (&self.smtp_user, &self.smtp_pass) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some(SmtpAuth {
                user: user.clone(),
                pass: pass.clone(),
            }),
            _ => None,
        };

        Ok(Provider::Smtp(SmtpConfig {
            host: self.smtp_host.clone(),
            port,
            secure: self.smtp_secure,
            ignore_tls: self.smtp_ignore_tls,
            auth,
        }))
    }
}

impl MailerConfig {
    /// Resolve from the process environment (loads `.env` first).
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(MailerOverrides::default())
    }

    /// Resolve from the process environment, then apply `overrides`.
    pub fn from_env_with(overrides: MailerOverrides) -> Result<Self> {
        dotenvy::dotenv().ok();
        let vars: HashMap<String, String> = env::vars().collect();
        Self::resolve(&vars, overrides)
    }

    /// Resolve a configuration from an environment snapshot plus overrides.
    ///
    /// Transport precedence is a fixed policy: a non-empty Resend credential
    /// always wins. An override Resend key beats everything; an environment
    /// Resend key beats an override SMTP block; an override SMTP block
    /// beats the environment SMTP defaults. An override Resend block with an
    /// empty key selects nothing and falls through the same chain.
    pub fn resolve(vars: &HashMap<String, String>, overrides: MailerOverrides) -> Result<Self> {
        let settings = EnvSettings::from_vars(vars)?;
        let env_provider = settings.provider()?;

        let provider = match (overrides.resend, env_provider, overrides.smtp) {
            (Some(resend), _, _) if !resend.api_key.is_empty() => Provider::Resend(resend),
            (_, resend @ Provider::Resend(_), _) => resend,
            (_, _, Some(smtp)) => Provider::Smtp(smtp),
            (_, smtp, None) => smtp,
        };

        Ok(MailerConfig {
            provider,
            from: overrides.from.unwrap_or(settings.email_from),
        })
    }
}
