//! Fixed layout for contact-form emails

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::models::Submission;

const SUBJECT_PREFIX: &str = "Portfolio Contact: ";
const SIGNATURE: &str = "Portfolio Website";
const SIGNATURE_TAGLINE: &str = "Sent from the portfolio contact form";

/// A rendered contact email, ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl ContactEmail {
    pub fn render(submission: &Submission, from: &str, to: &str, sent_at: DateTime<Local>) -> Self {
        let subject = submission.effective_subject();
        let date = format_local_date(&sent_at);

        Self {
            message_id: generate_message_id(from),
            from: from.to_string(),
            to: to.to_string(),
            subject: format!("{SUBJECT_PREFIX}{subject}"),
            html: render_html(submission, &subject, &date),
            text: render_text(submission, &subject, &date),
        }
    }
}

/// `<uuid@sender-domain>`
fn generate_message_id(from: &str) -> String {
    let domain = from
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim_end_matches('>'))
        .filter(|domain| !domain.is_empty())
        .unwrap_or("localhost");

    format!("<{}@{}>", Uuid::new_v4(), domain)
}

/// e.g. `10/16/2026, 2:05:09 PM`
fn format_local_date(at: &DateTime<Local>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn render_html(submission: &Submission, subject: &str, date: &str) -> String {
    let name = escape_html(&submission.name);
    let email = escape_html(&submission.email);
    let subject = escape_html(subject);
    let message = escape_html(&submission.message).replace('\n', "<br>");

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: #6366f1; border-bottom: 2px solid #6366f1; padding-bottom: 10px;">
        New Portfolio Contact Message
    </h2>

    <div style="background: #f8fafc; padding: 20px; border-radius: 8px; margin: 20px 0;">
        <h3 style="color: #1f2937; margin-top: 0;">Contact Details:</h3>
        <p><strong>Name:</strong> {name}</p>
        <p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
        <p><strong>Subject:</strong> {subject}</p>
        <p><strong>Date:</strong> {date}</p>
    </div>

    <div style="background: #ffffff; padding: 20px; border-left: 4px solid #6366f1; margin: 20px 0;">
        <h3 style="color: #1f2937; margin-top: 0;">Message:</h3>
        <p style="line-height: 1.6; color: #374151;">{message}</p>
    </div>

    <div style="background: #f0f9ff; padding: 15px; border-radius: 6px; margin-top: 20px;">
        <p style="margin: 0; color: #0369a1; font-size: 14px;">
            <strong>{SIGNATURE}</strong><br>
            {SIGNATURE_TAGLINE}
        </p>
    </div>
</div>
"#
    )
}

fn render_text(submission: &Submission, subject: &str, date: &str) -> String {
    format!(
        "New Portfolio Contact Message\n\
         \n\
         Contact Details:\n\
         - Name: {name}\n\
         - Email: {email}\n\
         - Subject: {subject}\n\
         - Date: {date}\n\
         \n\
         Message:\n\
         {message}\n\
         \n\
         ---\n\
         {SIGNATURE}\n\
         {SIGNATURE_TAGLINE}\n",
        name = submission.name,
        email = submission.email,
        message = submission.message,
    )
}
