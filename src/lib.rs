pub mod config;
pub mod error;
pub mod mail;

pub use config::{MailerConfig, MailerOverrides, Provider, ResendConfig, SmtpAuth, SmtpConfig};
pub use error::{Error, Result};
pub use mail::{MailTransport, Mailer};
