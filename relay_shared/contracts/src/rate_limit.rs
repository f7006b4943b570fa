use std::{future::Future, net::IpAddr, time::Duration};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RateLimitService: Send + Sync + 'static {
    /// Count one request from `client` against its current window and
    /// decide whether the request may proceed.
    fn acquire(&self, client: IpAddr) -> impl Future<Output = RateLimitDecision> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allow {
        /// Requests left in the current window.
        remaining: u32,
    },
    Deny {
        /// Time until the current window ends.
        retry_after: Duration,
    },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }
}

#[cfg(feature = "mock")]
impl MockRateLimitService {
    pub fn with_acquire(mut self, client: IpAddr, result: RateLimitDecision) -> Self {
        self.expect_acquire()
            .once()
            .with(mockall::predicate::eq(client))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
