pub mod ethereal;
pub mod message;
pub mod smtp;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use chrono::Local;
use futures::future::BoxFuture;

use crate::config::{MailBackend, MailConfig, MailCredentials};
use crate::models::Submission;

pub use ethereal::EtherealProvisioner;
pub use message::ContactEmail;
pub use smtp::SmtpMailTransport;

/// Outlook submission endpoint used by the real backend.
pub const OUTLOOK_SMTP_HOST: &str = "smtp-mail.outlook.com";
pub const OUTLOOK_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("Sandbox account provisioning failed: {0}")]
    Provision(String),
    #[error("Invalid address: {0}")]
    Address(String),
    #[error("Failed to build message: {0}")]
    Message(String),
    #[error("SMTP error: {0}")]
    Smtp(String),
}

/// Result of a successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub message_id: String,
    /// Only set for sandbox deliveries.
    pub preview_url: Option<String>,
}

/// SMTP submission account
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpAccount {
    pub host: String,
    pub port: u16,
    /// `true` for SMTPS, `false` for STARTTLS.
    pub implicit_tls: bool,
    pub user: String,
    pub pass: String,
    /// Web UI base for message previews (sandbox accounts only).
    pub web: Option<String>,
}

impl SmtpAccount {
    pub fn outlook(credentials: &MailCredentials) -> Self {
        Self {
            host: OUTLOOK_SMTP_HOST.to_string(),
            port: OUTLOOK_SMTP_PORT,
            implicit_tls: false,
            user: credentials.user.clone(),
            pass: credentials.pass.clone(),
            web: None,
        }
    }
}

impl std::fmt::Debug for SmtpAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpAccount")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("implicit_tls", &self.implicit_tls)
            .field("user", &self.user)
            .field("web", &self.web)
            .finish_non_exhaustive()
    }
}

/// Creates throwaway accounts on a public test relay
pub trait SandboxProvisioner: Send + Sync {
    fn provision(&self) -> BoxFuture<'_, Result<SmtpAccount, DeliveryError>>;
}

/// Submits a rendered email through an SMTP account.
/// Resolves to the server's reply text.
pub trait MailTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        account: &'a SmtpAccount,
        email: ContactEmail,
    ) -> BoxFuture<'a, Result<String, DeliveryError>>;
}

/// Delivery gateway for contact-form submissions
#[derive(Clone)]
pub struct Mailer {
    backend: MailBackend,
    recipient: String,
    provisioner: Arc<dyn SandboxProvisioner>,
    transport: Arc<dyn MailTransport>,
}

impl Mailer {
    /// Mailer backed by Outlook or Ethereal, depending on `config.backend`.
    pub fn new(config: &MailConfig) -> Self {
        Self::with_backends(
            config,
            Arc::new(EtherealProvisioner::new()),
            Arc::new(SmtpMailTransport),
        )
    }

    pub fn with_backends(
        config: &MailConfig,
        provisioner: Arc<dyn SandboxProvisioner>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            backend: config.backend.clone(),
            recipient: config.recipient.clone(),
            provisioner,
            transport,
        }
    }

    pub fn backend(&self) -> &MailBackend {
        &self.backend
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Render the submission and hand it to the selected backend.
    pub async fn deliver(&self, submission: &Submission) -> Result<DeliveryResult, DeliveryError> {
        let account = match &self.backend {
            MailBackend::Real(credentials) => SmtpAccount::outlook(credentials),
            MailBackend::Sandbox => {
                let account = self.provisioner.provision().await?;
                tracing::info!(user = %account.user, "Sandbox mail account provisioned");
                account
            }
        };

        let email = ContactEmail::render(submission, &account.user, &self.recipient, Local::now());
        let message_id = email.message_id.clone();

        let reply = self.transport.send(&account, email).await?;

        let preview_url = account
            .web
            .as_deref()
            .and_then(|web| ethereal::preview_url(web, &reply));

        tracing::info!(
            message_id = %message_id,
            preview_url = preview_url.as_deref().unwrap_or("-"),
            "Contact message sent"
        );

        Ok(DeliveryResult {
            message_id,
            preview_url,
        })
    }
}
