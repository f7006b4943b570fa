use std::future::Future;

use relay_models::email_address::EmailAddress;

/// Client for the outbound mail relay.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Hand a single email to the relay. Resolves once the relay accepted
    /// or rejected the message; there is no retry.
    fn send(&self, email: Email) -> impl Future<Output = anyhow::Result<EmailDelivery>> + Send;

    /// Check that the relay is reachable and accepts our credentials.
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: EmailAddress,
    pub subject: String,
    pub body: EmailBody,
    pub reply_to: Option<EmailAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBody {
    Text(String),
    /// `multipart/alternative` with a plain text and an html part.
    Alternative { text: String, html: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDelivery {
    /// Value of the `Message-ID` header of the relayed message.
    pub message_id: String,
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(mut self, email: Email, result: anyhow::Result<EmailDelivery>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_ping(mut self, ok: bool) -> Self {
        self.expect_ping().once().return_once(move || {
            Box::pin(std::future::ready(if ok {
                Ok(())
            } else {
                Err(anyhow::anyhow!("relay unreachable"))
            }))
        });
        self
    }
}
