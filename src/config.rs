use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Destination for contact-form messages when `CONTACT_RECIPIENT` is unset.
pub const DEFAULT_RECIPIENT: &str = "hello@portfolio.example";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub debug_port: u16,
    pub environment: Environment,
    pub static_dir: PathBuf,
    pub mail: MailConfig,
    pub rate_limit: RateLimitConfig,
}

/// Controls whether error details are exposed in API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }

    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("development") {
            Environment::Development
        } else {
            Environment::Production
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub backend: MailBackend,
    pub recipient: String,
}

/// Which mail-delivery path the contact endpoint uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailBackend {
    /// Long-lived account with the external provider.
    Real(MailCredentials),
    /// A disposable Ethereal account provisioned for every message.
    Sandbox,
}

#[derive(Clone, PartialEq, Eq)]
pub struct MailCredentials {
    pub user: String,
    pub pass: String,
}

impl std::fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailCredentials")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(15 * 60),
            max_requests: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RateLimitConfig::default();

        Ok(Config {
            server_host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parse_or(&var, "PORT", 3000).map_err(|_| ConfigError::InvalidPort)?,
            debug_port: parse_or(&var, "DEBUG_PORT", 3001).map_err(|_| ConfigError::InvalidPort)?,
            environment: var("APP_ENV")
                .map(|value| Environment::parse(&value))
                .unwrap_or_default(),
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            mail: MailConfig {
                backend: mail_backend(var("EMAIL_USER"), var("EMAIL_PASS"))?,
                recipient: var("CONTACT_RECIPIENT")
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string()),
            },
            rate_limit: RateLimitConfig {
                window: Duration::from_secs(
                    parse_or(&var, "RATE_LIMIT_WINDOW_SECONDS", defaults.window.as_secs())
                        .map_err(|_| ConfigError::InvalidNumber("RATE_LIMIT_WINDOW_SECONDS"))?,
                ),
                max_requests: parse_or(&var, "RATE_LIMIT_MAX", defaults.max_requests)
                    .map_err(|_| ConfigError::InvalidNumber("RATE_LIMIT_MAX"))?,
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn debug_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.debug_port)
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T, T::Err>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(key) {
        Some(value) if !value.is_empty() => value.parse(),
        _ => Ok(default),
    }
}

/// Empty values count as unset. Exactly one of the pair is a misconfiguration.
fn mail_backend(user: Option<String>, pass: Option<String>) -> Result<MailBackend, ConfigError> {
    let user = user.filter(|s| !s.is_empty());
    let pass = pass.filter(|s| !s.is_empty());

    match (user, pass) {
        (Some(user), Some(pass)) => Ok(MailBackend::Real(MailCredentials { user, pass })),
        (None, None) => Ok(MailBackend::Sandbox),
        (Some(_), None) => Err(ConfigError::PartialMailCredentials("EMAIL_PASS")),
        (None, Some(_)) => Err(ConfigError::PartialMailCredentials("EMAIL_USER")),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port")]
    InvalidPort,
    #[error("{0} must be a non-negative integer")]
    InvalidNumber(&'static str),
    #[error("{0} must be set together with the other mail credential variable")]
    PartialMailCredentials(&'static str),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).expect("Should load defaults");

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.debug_port, 3001);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.static_dir, PathBuf::from("."));
        assert_eq!(config.mail.backend, MailBackend::Sandbox);
        assert_eq!(config.mail.recipient, DEFAULT_RECIPIENT);
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_real_backend_when_both_credentials_set() {
        let config = config_from(&[("EMAIL_USER", "me@outlook.com"), ("EMAIL_PASS", "hunter2")])
            .expect("Should load config");

        assert_eq!(
            config.mail.backend,
            MailBackend::Real(MailCredentials {
                user: "me@outlook.com".to_string(),
                pass: "hunter2".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_credentials_fall_back_to_sandbox() {
        let config = config_from(&[("EMAIL_USER", ""), ("EMAIL_PASS", "")])
            .expect("Should load config");

        assert_eq!(config.mail.backend, MailBackend::Sandbox);
    }

    #[test]
    fn test_partial_credentials_rejected() {
        let result = config_from(&[("EMAIL_USER", "me@outlook.com")]);
        assert!(matches!(
            result,
            Err(ConfigError::PartialMailCredentials("EMAIL_PASS"))
        ));

        let result = config_from(&[("EMAIL_PASS", "hunter2")]);
        assert!(matches!(
            result,
            Err(ConfigError::PartialMailCredentials("EMAIL_USER"))
        ));
    }

    #[test]
    fn test_environment_and_overrides() {
        let config = config_from(&[
            ("APP_ENV", "Development"),
            ("PORT", "8080"),
            ("RATE_LIMIT_WINDOW_SECONDS", "60"),
            ("RATE_LIMIT_MAX", "2"),
        ])
        .expect("Should load config");

        assert!(config.environment.is_development());
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.rate_limit.max_requests, 2);
    }

    #[test]
    fn test_invalid_port() {
        assert!(matches!(
            config_from(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidPort)
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = MailCredentials {
            user: "me@outlook.com".to_string(),
            pass: "hunter2".to_string(),
        };

        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
