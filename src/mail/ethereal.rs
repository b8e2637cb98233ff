//! Disposable accounts on the Ethereal test relay

use std::sync::LazyLock;

use futures::future::BoxFuture;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{DeliveryError, SandboxProvisioner, SmtpAccount};

pub const ETHEREAL_API: &str = "https://api.nodemailer.com";
pub const ETHEREAL_WEB: &str = "https://ethereal.email";

/// Trailing `[KEY=value ...]` block of the relay's SMTP reply.
static REPLY_PROPS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]$").expect("reply pattern is valid"));
static PROP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z0-9]+)=(\S+)").expect("prop pattern is valid"));

#[derive(Clone)]
pub struct EtherealProvisioner {
    client: Client,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct AccountReply {
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    pass: Option<String>,
    #[serde(default)]
    smtp: Option<ServerInfo>,
    #[serde(default)]
    web: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerInfo {
    host: String,
    port: u16,
    secure: bool,
}

impl EtherealProvisioner {
    pub fn new() -> Self {
        Self::with_api_url(ETHEREAL_API)
    }

    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
        }
    }

    async fn create_account(&self) -> Result<SmtpAccount, DeliveryError> {
        #[derive(Serialize)]
        struct Payload {
            requestor: &'static str,
            version: &'static str,
        }

        let payload = Payload {
            requestor: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        };

        let res = self
            .client
            .post(format!("{}/user", self.api_url.trim_end_matches('/')))
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Provision(format!("request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(DeliveryError::Provision(format!("{}: {}", status, body)));
        }

        let reply: AccountReply = res
            .json()
            .await
            .map_err(|e| DeliveryError::Provision(format!("invalid reply: {}", e)))?;

        reply.into_account()
    }
}

impl Default for EtherealProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxProvisioner for EtherealProvisioner {
    fn provision(&self) -> BoxFuture<'_, Result<SmtpAccount, DeliveryError>> {
        Box::pin(self.create_account())
    }
}

impl AccountReply {
    fn into_account(self) -> Result<SmtpAccount, DeliveryError> {
        if self.status != "success" {
            return Err(DeliveryError::Provision(
                self.error.unwrap_or_else(|| format!("status {}", self.status)),
            ));
        }

        let (Some(user), Some(pass), Some(smtp)) = (self.user, self.pass, self.smtp) else {
            return Err(DeliveryError::Provision(
                "reply is missing account details".to_string(),
            ));
        };

        Ok(SmtpAccount {
            host: smtp.host,
            port: smtp.port,
            implicit_tls: smtp.secure,
            user,
            pass,
            web: Some(self.web.unwrap_or_else(|| ETHEREAL_WEB.to_string())),
        })
    }
}

/// Preview link for a message accepted by the relay, e.g.
/// `250 Accepted [STATUS=new MSGID=abc]` gives `{web}/message/abc`.
pub fn preview_url(web: &str, reply: &str) -> Option<String> {
    let props = REPLY_PROPS_RE.captures(reply.trim_end())?.get(1)?.as_str();

    let mut status = None;
    let mut msgid = None;
    for cap in PROP_RE.captures_iter(props) {
        match &cap[1] {
            "STATUS" => status = Some(cap[2].to_string()),
            "MSGID" => msgid = Some(cap[2].to_string()),
            _ => {}
        }
    }

    match (status, msgid) {
        (Some(_), Some(msgid)) => Some(format!("{}/message/{}", web.trim_end_matches('/'), msgid)),
        _ => None,
    }
}
