#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid mailer configuration: {0}")]
    InvalidConfig(String),

    #[error("Resend API key is required for the Resend mailer")]
    MissingResendConfig,

    #[error("SMTP configuration is required for the SMTP mailer")]
    MissingSmtpConfig,

    #[error("failed to send email: {0}")]
    SendFailed(String),
}

impl Error {
    /// Fallback text for transport failures that carry no usable message.
    pub(crate) const UNKNOWN: &'static str = "unknown error";
}

pub type Result<T> = std::result::Result<T, Error>;
