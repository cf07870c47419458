use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{MailerConfig, Provider};
use crate::error::{Error, Result};
use crate::mail::MailTransport;

/// Mailer backed by an SMTP server. The connection is established lazily on
/// the first send and pooled by lettre afterwards.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &MailerConfig) -> Result<Self> {
        let smtp = match &config.provider {
            Provider::Smtp(smtp) => smtp,
            Provider::Resend(_) => return Err(Error::MissingSmtpConfig),
        };

        if !smtp.secure {
            tracing::warn!("You are using an unsecured connection to the SMTP");
        }
        if smtp.ignore_tls {
            tracing::warn!("You are not using TLS certificate with the SMTP");
        }

        // secure -> implicit TLS, ignore_tls -> plaintext, otherwise STARTTLS
        let mut builder = if smtp.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
                .map_err(|e| Error::InvalidConfig(format!("SMTP relay setup failed: {}", e)))?
        } else if smtp.ignore_tls {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
                .map_err(|e| Error::InvalidConfig(format!("SMTP STARTTLS setup failed: {}", e)))?
        };

        builder = builder.port(smtp.port);

        if let Some(auth) = &smtp.auth {
            builder = builder.credentials(Credentials::new(auth.user.clone(), auth.pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<()> {
        let message = Message::builder()
            .from(self
                .from
                .parse()
                .map_err(|e| Error::SendFailed(format!("invalid from address: {}", e)))?)
            .to(to
                .parse()
                .map_err(|e| Error::SendFailed(format!("invalid recipient address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(text.to_string())
            .map_err(|e| Error::SendFailed(e.to_string()))?;

        self.transport.send(message).await.map_err(|e| {
            tracing::error!(error = %e, "failed to send email");
            Error::SendFailed(e.to_string())
        })?;

        Ok(())
    }
}
