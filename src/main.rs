use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mailbridge::{Mailer, MailerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let usage = "usage: mailbridge <to> <subject> [body...]";
    let mut args = std::env::args().skip(1);
    let to = args.next().ok_or_else(|| anyhow::anyhow!(usage))?;
    let subject = args.next().ok_or_else(|| anyhow::anyhow!(usage))?;
    let body = args.collect::<Vec<_>>().join(" ");

    // Load configuration
    let config = MailerConfig::from_env()?;
    tracing::info!(
        provider = config.provider.name(),
        from = %config.from,
        "Configuration loaded"
    );

    let mailer = Mailer::new(&config)?;
    mailer.send(&to, &subject, &body).await?;

    tracing::info!(%to, "Email sent");

    Ok(())
}
