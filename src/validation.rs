//! Contact-form input validation

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ContactRequest, Submission};

/// `local@domain.tld` with no whitespace and a single `@`.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please provide name, email, and message")]
    MissingField,
    #[error("Please provide a valid email address")]
    InvalidEmail,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check presence and shape of the submitted fields.
/// Values are passed through untouched: no trimming, no case-folding.
pub fn validate(request: ContactRequest) -> Result<Submission, ValidationError> {
    let (Some(name), Some(email), Some(message)) = (
        non_empty(request.name),
        non_empty(request.email),
        non_empty(request.message),
    ) else {
        return Err(ValidationError::MissingField);
    };

    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(Submission {
        name,
        email,
        subject: request.subject,
        message,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn request(name: Option<&str>, email: Option<&str>, message: Option<&str>) -> ContactRequest {
        ContactRequest {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            subject: None,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_missing_fields() {
        let cases = [
            request(None, Some("jo@example.com"), Some("Hi")),
            request(Some("Jo"), None, Some("Hi")),
            request(Some("Jo"), Some("jo@example.com"), None),
            request(Some(""), Some("jo@example.com"), Some("Hi")),
            request(Some("Jo"), Some(""), Some("Hi")),
            request(Some("Jo"), Some("jo@example.com"), Some("")),
        ];

        for case in cases {
            assert_eq!(validate(case), Err(ValidationError::MissingField));
        }
    }

    #[test]
    fn test_missing_field_wins_over_invalid_email() {
        let result = validate(request(Some("Jo"), Some("nope"), None));
        assert_eq!(result, Err(ValidationError::MissingField));
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "jo",
            "jo.example.com",
            "jo@example",
            "@example.com",
            "jo@.com",
            "jo@example.",
            "jo@@example.com",
            "j o@example.com",
            "jo@exa mple.com",
            " jo@example.com",
        ] {
            assert!(!is_valid_email(email), "{email} should be rejected");
            assert_eq!(
                validate(request(Some("Jo"), Some(email), Some("Hi"))),
                Err(ValidationError::InvalidEmail)
            );
        }
    }

    #[test]
    fn test_valid_emails() {
        for email in ["jo@example.com", "JO@EXAMPLE.COM", "a.b+c@mail.example.co.uk"] {
            assert!(is_valid_email(email), "{email} should be accepted");
        }
    }

    #[test]
    fn test_valid_submission_is_passed_through() {
        let submission = validate(ContactRequest {
            name: Some(" Jo ".to_string()),
            email: Some("jo@example.com".to_string()),
            subject: Some("Hello".to_string()),
            message: Some("line one\nline two".to_string()),
        })
        .expect("Should validate");

        assert_eq!(
            submission,
            Submission {
                name: " Jo ".to_string(),
                email: "jo@example.com".to_string(),
                subject: Some("Hello".to_string()),
                message: "line one\nline two".to_string(),
            }
        );
    }
}
