use std::sync::Arc;

use crate::config::Config;
use crate::mail::Mailer;
use crate::rate_limit::RateLimiter;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mailer: Arc<Mailer>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config, mailer: Mailer) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit);

        Self {
            config: Arc::new(config),
            mailer: Arc::new(mailer),
            rate_limiter: Arc::new(rate_limiter),
        }
    }
}
