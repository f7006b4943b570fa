use anyhow::Context;
use clap::Subcommand;
use relay_config::Config;
use relay_email_contracts::{Email, EmailBody, EmailService};
use relay_models::email_address::EmailAddress;
use tracing::info;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddress },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddress) -> anyhow::Result<()> {
    let email_service = email::connect(&config.email).await?;

    let delivery = email_service
        .send(Email {
            recipient,
            subject: "Email Deliverability Test".into(),
            body: EmailBody::Text("Email deliverability seems to be working!".into()),
            reply_to: None,
        })
        .await
        .context("Failed to send email")?;

    info!(message_id = %delivery.message_id, "Test email sent");

    Ok(())
}
