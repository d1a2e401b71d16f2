//! Sliding-window throttle on outgoing friend requests.
//!
//! There is no counter of its own: each check counts the sender's rows whose
//! `created_at` falls inside the trailing window. The check is not atomic with
//! the insert that follows it, so concurrent sends from one sender can overshoot
//! the cap.

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error, modules::friend::repository::FriendRequestRepository, utils::clock::Clock,
};

#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: chrono::Duration,
}

impl RateLimitPolicy {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        let window = i64::try_from(window_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX);
        Self { max_requests, window }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(3, 60)
    }
}

pub struct RateLimiter<R>
where
    R: FriendRequestRepository,
{
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    policy: RateLimitPolicy,
}

impl<R: FriendRequestRepository> Clone for RateLimiter<R> {
    fn clone(&self) -> Self {
        Self { repo: self.repo.clone(), clock: self.clock.clone(), policy: self.policy }
    }
}

impl<R> RateLimiter<R>
where
    R: FriendRequestRepository,
{
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>, policy: RateLimitPolicy) -> Self {
        Self { repo, clock, policy }
    }

    pub async fn can_send(&self, sender_id: &Uuid) -> Result<bool, error::SystemError> {
        let since = self
            .clock
            .now()
            .checked_sub_signed(self.policy.window)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC);
        let recent = self.repo.count_sent_since(sender_id, since).await?;

        let allowed = recent < i64::from(self.policy.max_requests);
        if !allowed {
            log::debug!(
                "Sender {} throttled: {} requests since {}",
                sender_id,
                recent,
                since.to_rfc3339()
            );
        }
        Ok(allowed)
    }
}
