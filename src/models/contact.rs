use serde::{Deserialize, Serialize};

/// Contact-form payload as it arrives on the wire
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

impl Submission {
    /// The caller's subject, or `New Message from {name}` when none was given.
    pub fn effective_subject(&self) -> String {
        match self.subject.as_deref() {
            Some(subject) if !subject.is_empty() => subject.to_string(),
            _ => format!("New Message from {}", self.name),
        }
    }
}

/// Response after a message was delivered
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}
