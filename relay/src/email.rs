use anyhow::Context;
use relay_config::EmailConfig;
use relay_email_impl::EmailServiceImpl;

/// Create the client for the configured SMTP relay
pub async fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(
        &config.smtp_url,
        config.user.clone(),
        &config.password,
        config.timeout(),
    )
    .await
    .context("Failed to create SMTP client")
}
