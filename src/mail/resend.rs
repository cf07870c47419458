use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::{MailerConfig, Provider};
use crate::error::{Error, Result};
use crate::mail::MailTransport;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Mailer backed by the Resend HTTP API.
pub struct ResendMailer {
    client: Client,
    api_key: String,
    from: String,
    api_url: String,
}

impl ResendMailer {
    pub fn new(config: &MailerConfig) -> Result<Self> {
        Self::with_api_url(config, RESEND_API_URL)
    }

    pub(crate) fn with_api_url(config: &MailerConfig, api_url: &str) -> Result<Self> {
        let resend = match &config.provider {
            Provider::Resend(resend) => resend,
            Provider::Smtp(_) => return Err(Error::MissingResendConfig),
        };
        if resend.api_key.is_empty() {
            return Err(Error::MissingResendConfig);
        }

        Ok(Self {
            client: Client::new(),
            api_key: resend.api_key.clone(),
            from: config.from.clone(),
            api_url: api_url.to_string(),
        })
    }
}

#[async_trait]
impl MailTransport for ResendMailer {
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Payload<'a> {
            from: &'a str,
            to: Vec<&'a str>,
            subject: &'a str,
            text: &'a str,
        }

        let payload = Payload {
            from: &self.from,
            to: vec![to],
            subject,
            text,
        };

        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to send email");
                Error::SendFailed(e.to_string())
            })?;

        if !res.status().is_success() {
            let body = match res.text().await {
                Ok(body) if !body.is_empty() => body,
                _ => Error::UNKNOWN.to_string(),
            };
            tracing::error!(error = %body, "Resend API rejected email");
            return Err(Error::SendFailed(body));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResendConfig, SmtpConfig};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_key: &str) -> MailerConfig {
        MailerConfig {
            provider: Provider::Resend(ResendConfig {
                api_key: api_key.to_string(),
            }),
            from: "no-reply@example.com".to_string(),
        }
    }

    #[test]
    fn test_construction_requires_resend_branch() {
        let smtp_only = MailerConfig {
            provider: Provider::Smtp(SmtpConfig {
                host: "localhost".to_string(),
                port: 2500,
                secure: false,
                ignore_tls: true,
                auth: None,
            }),
            from: "no-reply@example.com".to_string(),
        };

        assert!(matches!(
            ResendMailer::new(&smtp_only),
            Err(Error::MissingResendConfig)
        ));
    }

    #[test]
    fn test_construction_rejects_empty_api_key() {
        assert!(matches!(
            ResendMailer::new(&config("")),
            Err(Error::MissingResendConfig)
        ));
    }

    #[tokio::test]
    async fn test_send_posts_to_resend_api() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("Authorization", "Bearer re_test123"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\":\"1\"}"))
            .expect(1)
            .mount(&server)
            .await;

        let mailer =
            ResendMailer::with_api_url(&config("re_test123"), &format!("{}/emails", server.uri()))
                .expect("Should build mailer");

        mailer
            .send("user@example.com", "Subject", "Body")
            .await
            .expect("Should send email");
    }

    #[tokio::test]
    async fn test_send_failure_carries_api_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let mailer = ResendMailer::with_api_url(&config("re_bad"), &server.uri())
            .expect("Should build mailer");

        let err = mailer
            .send("user@example.com", "Subject", "Body")
            .await
            .expect_err("Should fail");

        assert!(err.to_string().contains("failed to send email"));
        assert!(err.to_string().contains("invalid api key"));
    }

    #[tokio::test]
    async fn test_send_failure_without_body_uses_placeholder() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mailer = ResendMailer::with_api_url(&config("re_test123"), &server.uri())
            .expect("Should build mailer");

        let err = mailer
            .send("user@example.com", "Subject", "Body")
            .await
            .expect_err("Should fail");

        assert!(err.to_string().contains("unknown error"));
    }
}
