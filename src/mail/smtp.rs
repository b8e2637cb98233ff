use futures::future::BoxFuture;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{ContactEmail, DeliveryError, MailTransport, SmtpAccount};

/// Sends through a fresh lettre transport for each account
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailTransport;

impl SmtpMailTransport {
    fn connect(account: &SmtpAccount) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
        let builder = if account.implicit_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&account.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&account.host)
        };
        let builder = builder.map_err(|e| DeliveryError::Smtp(e.to_string()))?;

        Ok(builder
            .port(account.port)
            .credentials(Credentials::new(account.user.clone(), account.pass.clone()))
            .build())
    }
}

impl MailTransport for SmtpMailTransport {
    fn send<'a>(
        &'a self,
        account: &'a SmtpAccount,
        email: ContactEmail,
    ) -> BoxFuture<'a, Result<String, DeliveryError>> {
        Box::pin(async move {
            let message = build_message(email)?;
            let transport = Self::connect(account)?;

            let response = transport
                .send(message)
                .await
                .map_err(|e| DeliveryError::Smtp(e.to_string()))?;

            Ok(response.message().collect::<Vec<_>>().join("\n"))
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|e| DeliveryError::Address(format!("{}: {}", address, e)))
}

/// `multipart/alternative` message with the plain and HTML bodies.
pub fn build_message(email: ContactEmail) -> Result<Message, DeliveryError> {
    Message::builder()
        .message_id(Some(email.message_id))
        .from(parse_mailbox(&email.from)?)
        .to(parse_mailbox(&email.to)?)
        .subject(email.subject)
        .multipart(MultiPart::alternative_plain_html(email.text, email.html))
        .map_err(|e| DeliveryError::Message(e.to_string()))
}
