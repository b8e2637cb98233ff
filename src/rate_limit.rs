//! Fixed-window request limiter keyed by client address

use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::RetryAfter;
use axum_extra::TypedHeader;
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Expired windows are swept once the map grows past this many clients.
const PURGE_THRESHOLD: usize = 4096;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

pub struct RateLimiter {
    config: RateLimitConfig,
    windows: DashMap<IpAddr, Window>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.config.max_requests
    }

    /// Count a hit for `client` and decide whether it may proceed.
    pub fn check(&self, client: IpAddr) -> Decision {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: IpAddr, now: Instant) -> Decision {
        if self.windows.len() >= PURGE_THRESHOLD {
            self.purge_expired(now);
        }

        let mut window = self.windows.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });

        let mut elapsed = now.saturating_duration_since(window.started);
        if elapsed >= self.config.window {
            *window = Window {
                started: now,
                count: 0,
            };
            elapsed = Duration::ZERO;
        }

        // Rejected hits count too; hammering does not shorten the wait.
        window.count = window.count.saturating_add(1);

        if window.count <= self.config.max_requests {
            Decision::Allowed {
                remaining: self.config.max_requests - window.count,
            }
        } else {
            Decision::Limited {
                retry_after: self.config.window - elapsed,
            }
        }
    }

    pub fn purge_expired(&self, now: Instant) {
        let window = self.config.window;
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started) < window);
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

fn set_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
}

/// Middleware guarding the contact endpoint.
pub async fn limit_submissions(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let limiter = &state.rate_limiter;

    match limiter.check(addr.ip()) {
        Decision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            set_limit_headers(response.headers_mut(), limiter.limit(), remaining);
            response
        }
        Decision::Limited { retry_after } => {
            tracing::warn!(client = %addr.ip(), "Contact form rate limit exceeded");

            let retry_after = Duration::from_secs(retry_after.as_secs_f64().ceil() as u64);
            let mut response =
                (TypedHeader(RetryAfter::delay(retry_after)), AppError::RateLimited).into_response();
            set_limit_headers(response.headers_mut(), limiter.limit(), 0);
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use pretty_assertions::assert_eq;

    use super::*;

    fn limiter(max_requests: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            window: Duration::from_secs(15 * 60),
            max_requests,
        })
    }

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn test_allows_up_to_limit_then_rejects() {
        let limiter = limiter(5);
        let now = Instant::now();

        for expected_remaining in (0..5).rev() {
            assert_eq!(
                limiter.check_at(ip(1), now),
                Decision::Allowed {
                    remaining: expected_remaining
                }
            );
        }

        assert_eq!(
            limiter.check_at(ip(1), now + Duration::from_secs(60)),
            Decision::Limited {
                retry_after: Duration::from_secs(14 * 60)
            }
        );
    }

    #[test]
    fn test_clients_are_counted_separately() {
        let limiter = limiter(1);
        let now = Instant::now();

        assert!(matches!(limiter.check_at(ip(1), now), Decision::Allowed { .. }));
        assert!(matches!(limiter.check_at(ip(2), now), Decision::Allowed { .. }));
        assert!(matches!(limiter.check_at(ip(1), now), Decision::Limited { .. }));
    }

    #[test]
    fn test_window_resets() {
        let limiter = limiter(1);
        let now = Instant::now();

        limiter.check_at(ip(1), now);
        assert!(matches!(limiter.check_at(ip(1), now), Decision::Limited { .. }));

        let later = now + Duration::from_secs(15 * 60);
        assert_eq!(
            limiter.check_at(ip(1), later),
            Decision::Allowed { remaining: 0 }
        );
    }

    #[test]
    fn test_purge_drops_expired_windows() {
        let limiter = limiter(5);
        let now = Instant::now();

        limiter.check_at(ip(1), now);
        limiter.check_at(ip(2), now + Duration::from_secs(10 * 60));

        limiter.purge_expired(now + Duration::from_secs(16 * 60));

        assert_eq!(limiter.tracked_clients(), 1);
    }
}
