use std::time::Duration;

use anyhow::{anyhow, ensure, Context};
use lettre::{
    message::{header::ContentType, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use relay_email_contracts::{Email, EmailBody, EmailDelivery, EmailService};
use relay_models::email_address::EmailAddress;
use relay_utils::Apply;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddress,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    timeout: Duration,
}

impl EmailServiceImpl {
    /// Create a client for the smtp server at `url`, authenticating as `from`.
    ///
    /// No connection is opened until the first email is sent or the server is
    /// pinged.
    pub async fn new(
        url: &str,
        from: EmailAddress,
        password: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let credentials = Credentials::new(from.as_str().into(), password.into());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)
            .context("Invalid smtp url")?
            .credentials(credentials)
            .timeout(Some(timeout))
            .build();

        Ok(Self {
            from,
            transport,
            timeout,
        })
    }

    #[cfg(feature = "dummy")]
    pub async fn dummy() -> Self {
        Self::new(
            "smtp://dummy",
            "dummy@example.com".parse().unwrap(),
            "dummy",
            Duration::from_secs(1),
        )
        .await
        .unwrap()
    }

    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        let builder = Message::builder()
            .from(self.from.clone().into_mailbox())
            .to(email.recipient.into_mailbox())
            .apply_map(email.reply_to, |builder, reply_to| {
                builder.reply_to(reply_to.into_mailbox())
            })
            .subject(email.subject)
            .message_id(None);

        let message = match email.body {
            EmailBody::Text(text) => builder.header(ContentType::TEXT_PLAIN).body(text),
            EmailBody::Alternative { text, html } => {
                builder.multipart(MultiPart::alternative_plain_html(text, html))
            }
        }?;

        Ok(message)
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<EmailDelivery> {
        let message = self.build_message(email)?;
        let message_id = message
            .headers()
            .get_raw("Message-ID")
            .unwrap_or_default()
            .to_owned();

        let response = tokio::time::timeout(self.timeout, self.transport.send(message))
            .await
            .map_err(|_| anyhow!("smtp server did not respond within {:?}", self.timeout))??;

        ensure!(
            response.is_positive(),
            "smtp server rejected the message with code {}",
            response.code()
        );
        debug!(%message_id, code = %response.code(), "smtp server accepted message");

        Ok(EmailDelivery { message_id })
    }

    async fn ping(&self) -> anyhow::Result<()> {
        tokio::time::timeout(self.timeout, self.transport.test_connection())
            .await
            .map_err(|_| anyhow!("smtp server did not respond within {:?}", self.timeout))??
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn sut() -> EmailServiceImpl {
        EmailServiceImpl::new(
            "smtp://localhost:2525",
            "relay@example.com".parse().unwrap(),
            "secret",
            Duration::from_secs(1),
        )
        .await
        .unwrap()
    }

    async fn formatted(email: Email) -> String {
        let message = sut().await.build_message(email).unwrap();
        String::from_utf8(message.formatted()).unwrap()
    }

    #[tokio::test]
    async fn invalid_url() {
        let result = EmailServiceImpl::new(
            "http://smtp.example.com",
            "relay@example.com".parse().unwrap(),
            "secret",
            Duration::from_secs(1),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn alternative_message_headers() {
        let message = formatted(Email {
            recipient: "relay@example.com".parse().unwrap(),
            subject: "CLIENT CONTACT FROM WEBSITE".into(),
            body: EmailBody::Alternative {
                text: "Hello World!".into(),
                html: "<p>Hello World!</p>".into(),
            },
            reply_to: Some("visitor@example.org".parse().unwrap()),
        })
        .await;

        assert!(message.contains("From: relay@example.com\r\n"));
        assert!(message.contains("To: relay@example.com\r\n"));
        assert!(message.contains("Reply-To: visitor@example.org\r\n"));
        assert!(message.contains("Subject: CLIENT CONTACT FROM WEBSITE\r\n"));
        assert!(message.contains("Message-ID: "));
        assert!(message.contains("multipart/alternative"));
        assert!(message.contains("text/plain"));
        assert!(message.contains("text/html"));
    }

    #[tokio::test]
    async fn text_message_without_reply_to() {
        let message = formatted(Email {
            recipient: "someone@example.com".parse().unwrap(),
            subject: "Email Deliverability Test".into(),
            body: EmailBody::Text("It works".into()),
            reply_to: None,
        })
        .await;

        assert!(message.contains("To: someone@example.com\r\n"));
        assert!(!message.contains("Reply-To:"));
        assert!(message.contains("Content-Type: text/plain"));
    }
}
