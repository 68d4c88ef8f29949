use governor::{
    Quota, RateLimiter as GovernorRateLimiter,
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
};
use nonzero_ext::nonzero;
use std::{num::NonZeroU32, time::Duration};

// BOT starts answering with empty tables when hammered.
const FALLBACK_REQ_PER_SEC: NonZeroU32 = nonzero!(5u32);
const FALLBACK_MS_BETWEEN_REQ: Duration = Duration::from_millis(200);

type SpecificGovernorRateLimiter =
    GovernorRateLimiter<NotKeyed, InMemoryState, QuantaClock, NoOpMiddleware<QuantaInstant>>;

pub struct RateLimiter {
    req_per_sec: SpecificGovernorRateLimiter,
    ms_between_req: SpecificGovernorRateLimiter,
}

impl RateLimiter {
    pub fn new(req_per_sec: u32, ms_between_req: u64) -> Self {
        let req_per_sec = NonZeroU32::new(req_per_sec).unwrap_or(FALLBACK_REQ_PER_SEC);
        let period = Duration::from_millis(ms_between_req);

        // Limit to X total req/sec on average.
        let req_per_sec = GovernorRateLimiter::direct(Quota::per_second(req_per_sec));

        // Limit to Y req/ms (i.e. no two requests closer than Y ms).
        let quota = Quota::with_period(period)
            .or_else(|| Quota::with_period(FALLBACK_MS_BETWEEN_REQ))
            .unwrap_or_else(|| Quota::per_second(FALLBACK_REQ_PER_SEC));
        let ms_between_req = GovernorRateLimiter::direct(quota);

        RateLimiter {
            req_per_sec,
            ms_between_req,
        }
    }

    pub async fn wait_until_ready(&self) {
        // Order matters: a very short period behind a loose per-second quota
        // would let queued callers cross the per-second boundary together.
        self.req_per_sec.until_ready().await;
        self.ms_between_req.until_ready().await;
    }
}
