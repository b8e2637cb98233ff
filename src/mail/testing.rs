//! In-memory mail backends for tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use futures::future::BoxFuture;

use super::ethereal::ETHEREAL_WEB;
use super::{ContactEmail, DeliveryError, MailTransport, SandboxProvisioner, SmtpAccount};

/// Hands out a new numbered account on every call.
#[derive(Default)]
pub struct FakeProvisioner {
    calls: AtomicUsize,
    fail_with: Option<String>,
}

impl FakeProvisioner {
    pub fn failing(reason: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_with: Some(reason.to_string()),
        }
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SandboxProvisioner for FakeProvisioner {
    fn provision(&self) -> BoxFuture<'_, Result<SmtpAccount, DeliveryError>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let result = match &self.fail_with {
            Some(reason) => Err(DeliveryError::Provision(reason.clone())),
            None => Ok(SmtpAccount {
                host: "smtp.ethereal.email".to_string(),
                port: 587,
                implicit_tls: false,
                user: format!("sandbox{}@ethereal.email", n),
                pass: format!("pass{}", n),
                web: Some(ETHEREAL_WEB.to_string()),
            }),
        };
        Box::pin(async move { result })
    }
}

/// Records every email instead of sending it.
#[derive(Default)]
pub struct FakeTransport {
    sent: Mutex<Vec<(SmtpAccount, ContactEmail)>>,
    fail_with: Option<String>,
}

impl FakeTransport {
    pub fn failing(reason: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(reason.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<(SmtpAccount, ContactEmail)> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailTransport for FakeTransport {
    fn send<'a>(
        &'a self,
        account: &'a SmtpAccount,
        email: ContactEmail,
    ) -> BoxFuture<'a, Result<String, DeliveryError>> {
        let result = match &self.fail_with {
            Some(reason) => Err(DeliveryError::Smtp(reason.clone())),
            None => {
                let mut sent = self.sent.lock().unwrap();
                sent.push((account.clone(), email));
                Ok(format!("Accepted [STATUS=new MSGID=msg-{}]", sent.len()))
            }
        };
        Box::pin(async move { result })
    }
}
