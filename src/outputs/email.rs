//! SMTP delivery of the rendered digest.
//!
//! One authenticated STARTTLS session to Gmail per run, one message, sender
//! and recipient are the same address. An empty digest skips the session
//! entirely. Send failures are logged and absorbed; the run still finishes.

use crate::models::DigestContent;
use crate::outputs::render::{self, BodyKind};
use lettre::message::{Mailbox, Message, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::error::Error;
use tracing::{error, info, instrument};

const SMTP_HOST: &str = "smtp.gmail.com";
const SMTP_PORT: u16 = 587;
const SUBJECT: &str = "Today's square picks: AI digest";

/// What happened to the message; logged, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The digest was empty; no SMTP session was opened.
    Skipped,
    Sent,
    Failed,
}

/// Sends the digest to the configured address over SMTP.
///
/// Built once at startup so that a malformed address or host name fails the
/// run before any scraping happens.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    mailbox: Mailbox,
}

impl Mailer {
    /// Build a mailer for the Gmail STARTTLS relay.
    pub fn new(address: &str, password: &str) -> Result<Self, Box<dyn Error>> {
        Self::with_relay(address, password, SMTP_HOST, SMTP_PORT)
    }

    fn with_relay(
        address: &str,
        password: &str,
        host: &str,
        port: u16,
    ) -> Result<Self, Box<dyn Error>> {
        let creds = Credentials::new(address.to_string(), password.to_string());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(port)
            .credentials(creds)
            .build();
        let mailbox: Mailbox = address.parse()?;
        Ok(Self { transport, mailbox })
    }

    /// Build the single outgoing message for a non-empty digest.
    fn compose(&self, content: &DigestContent) -> Result<Message, lettre::error::Error> {
        let (body, kind) = render::digest_body(content);
        let content_type = match kind {
            BodyKind::Html => header::ContentType::TEXT_HTML,
            BodyKind::Plain => header::ContentType::TEXT_PLAIN,
        };

        Message::builder()
            .from(self.mailbox.clone())
            .to(self.mailbox.clone())
            .subject(SUBJECT)
            .header(content_type)
            .body(body)
    }

    /// Render and send the digest, or skip when there is nothing to send.
    #[instrument(level = "info", skip_all)]
    pub async fn deliver(&self, content: &DigestContent) -> DeliveryOutcome {
        if content.is_empty() {
            info!("Nothing to send; skipping email");
            return DeliveryOutcome::Skipped;
        }

        let message = match self.compose(content) {
            Ok(message) => message,
            Err(e) => {
                error!(error = %e, "Failed to build email message");
                return DeliveryOutcome::Failed;
            }
        };

        match self.transport.send(message).await {
            Ok(_) => {
                info!(to = %self.mailbox, "Email sent");
                DeliveryOutcome::Sent
            }
            Err(e) => {
                error!(error = %e, "Email send failed");
                DeliveryOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recommendation;

    // Port 9 (discard) is assumed closed; the transport is never reached in
    // the skip case anyway.
    fn unreachable_mailer() -> Mailer {
        Mailer::with_relay("me@example.com", "secret", "127.0.0.1", 9).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_address() {
        assert!(Mailer::new("not an address", "secret").is_err());
    }

    #[tokio::test]
    async fn test_deliver_skips_empty_structured_digest() {
        let mailer = unreachable_mailer();
        let outcome = mailer.deliver(&DigestContent::Structured(vec![])).await;
        assert_eq!(outcome, DeliveryOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_deliver_skips_blank_raw_digest() {
        let mailer = unreachable_mailer();
        let outcome = mailer.deliver(&DigestContent::Raw("  \n".to_string())).await;
        assert_eq!(outcome, DeliveryOutcome::Skipped);
    }

    #[test]
    fn test_compose_addresses_sender_as_recipient() {
        let mailer = unreachable_mailer();
        let content = DigestContent::Structured(vec![Recommendation {
            title: "A".to_string(),
            link: "https://x/1".to_string(),
            summary: "about A".to_string(),
        }]);

        let message = mailer.compose(&content).unwrap();
        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 1);
        assert_eq!(envelope.to()[0].to_string(), "me@example.com");

        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains(SUBJECT));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_compose_plain_digest_is_text_plain() {
        let mailer = unreachable_mailer();
        let message = mailer
            .compose(&DigestContent::Raw("1. [A]".to_string()))
            .unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("1. [A]"));
    }

    #[tokio::test]
    async fn test_deliver_send_failure_is_absorbed() {
        let mailer = unreachable_mailer();
        let content = DigestContent::Structured(vec![Recommendation {
            title: "A".to_string(),
            link: "https://x/1".to_string(),
            summary: "about A".to_string(),
        }]);

        let outcome = mailer.deliver(&content).await;
        assert_eq!(outcome, DeliveryOutcome::Failed);
    }
}
