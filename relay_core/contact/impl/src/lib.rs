use std::sync::Arc;

use relay_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use relay_email_contracts::{Email, EmailBody, EmailService};
use relay_models::{contact::ContactSubmission, email_address::EmailAddress};
use relay_templates_contracts::{ContactTemplate, RenderedTemplate, TemplateService};
use tracing::{error, info};

pub const CONTACT_EMAIL_SUBJECT: &str = "CLIENT CONTACT FROM WEBSITE";

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Template, Email> {
    template: Template,
    email: Email,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Mailbox receiving the submissions. This is the authenticated relay
    /// account, since most relays only accept their own address as sender.
    pub recipient: Arc<EmailAddress>,
}

impl<Template, Email> ContactFeatureServiceImpl<Template, Email> {
    pub fn new(template: Template, email: Email, config: ContactFeatureConfig) -> Self {
        Self {
            template,
            email,
            config,
        }
    }
}

impl<TemplateS, EmailS> ContactFeatureService for ContactFeatureServiceImpl<TemplateS, EmailS>
where
    TemplateS: TemplateService,
    EmailS: EmailService,
{
    async fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<(), ContactSendMessageError> {
        let email = self.build_email(submission)?;

        match self.email.send(email).await {
            Ok(delivery) => {
                info!(message_id = %delivery.message_id, "relayed contact message");
                Ok(())
            }
            Err(err) => {
                error!("Failed to relay contact message: {err:#}");
                Err(ContactSendMessageError::Send)
            }
        }
    }
}

impl<TemplateS, EmailS> ContactFeatureServiceImpl<TemplateS, EmailS>
where
    TemplateS: TemplateService,
{
    fn build_email(
        &self,
        submission: ContactSubmission,
    ) -> Result<Email, ContactSendMessageError> {
        let RenderedTemplate { text, html } =
            self.template.render(&ContactTemplate::from(&submission))?;

        Ok(Email {
            recipient: (*self.config.recipient).clone(),
            subject: CONTACT_EMAIL_SUBJECT.into(),
            body: EmailBody::Alternative { text, html },
            reply_to: Some(submission.email),
        })
    }
}
