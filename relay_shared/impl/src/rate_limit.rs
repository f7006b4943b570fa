use std::{collections::HashMap, net::IpAddr, sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use relay_shared_contracts::{
    rate_limit::{RateLimitDecision, RateLimitService},
    time::TimeService,
};
use tokio::sync::Mutex;
use tracing::trace;

/// Fixed window rate limiter keyed by client address.
///
/// The first request of a client opens a window of `config.window`. Every
/// request (including denied ones) is counted and once more than
/// `config.max_requests` requests have been seen, the client is denied until
/// the window ends.
#[derive(Debug, Clone)]
pub struct RateLimitServiceImpl<Time> {
    time: Time,
    config: RateLimitServiceConfig,
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitServiceConfig {
    pub window: Duration,
    pub max_requests: u32,
}

#[derive(Debug, Default)]
struct State {
    windows: HashMap<IpAddr, Window>,
    last_sweep: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: DateTime<Utc>,
    hits: u32,
}

impl<Time> RateLimitServiceImpl<Time> {
    pub fn new(time: Time, config: RateLimitServiceConfig) -> Self {
        Self {
            time,
            config,
            state: Default::default(),
        }
    }
}

impl<Time> RateLimitService for RateLimitServiceImpl<Time>
where
    Time: TimeService,
{
    async fn acquire(&self, client: IpAddr) -> RateLimitDecision {
        let now = self.time.now();
        let mut state = self.state.lock().await;
        state.sweep(now, self.config.window);

        let window = state.windows.entry(client).or_insert(Window {
            started_at: now,
            hits: 0,
        });
        if now >= window_end(window.started_at, self.config.window) {
            *window = Window {
                started_at: now,
                hits: 0,
            };
        }
        window.hits = window.hits.saturating_add(1);

        if window.hits <= self.config.max_requests {
            return RateLimitDecision::Allow {
                remaining: self.config.max_requests - window.hits,
            };
        }

        let retry_after = (window_end(window.started_at, self.config.window) - now)
            .to_std()
            .unwrap_or_default();
        trace!(%client, hits = window.hits, ?retry_after, "rate limit exceeded");
        RateLimitDecision::Deny { retry_after }
    }
}

impl State {
    /// Drop expired windows, at most once per window length.
    fn sweep(&mut self, now: DateTime<Utc>, window: Duration) {
        if self.last_sweep.is_some_and(|last| now < window_end(last, window)) {
            return;
        }
        self.windows.retain(|_, w| now < window_end(w.started_at, window));
        self.last_sweep = Some(now);
    }
}

/// End of a window starting at `started_at`. Saturates instead of overflowing
/// for windows that reach past the representable time range.
fn window_end(started_at: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(window)
        .ok()
        .and_then(|window| started_at.checked_add_signed(window))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
