use crate::error::AppError;
use dashmap::DashMap;
use std::time::Instant;
use types::ids::ParticipantId;

#[derive(Clone)]
struct Bucket {
    capacity: u32,
    tokens: f64,
    refill_rate: f64,
    last_update: Instant,
}

impl Bucket {
    fn new(capacity: u32, refill_rate: f64, now: Instant) -> Self {
        Self {
            capacity,
            tokens: capacity as f64,
            refill_rate,
            last_update: now,
        }
    }

    fn allow_request(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = f64::min(
            self.capacity as f64,
            self.tokens + elapsed * self.refill_rate,
        );
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Token bucket per participant guarding inbound frames
///
/// Sized well above the burst a single swipe gesture produces, so only
/// misbehaving sockets are throttled.
pub struct RateLimiter {
    buckets: DashMap<ParticipantId, Bucket>,
    capacity: u32,
    refill_rate: f64,
}

impl RateLimiter {
    pub fn new(capacity: u32, refill_rate: f64) -> Self {
        Self {
            buckets: DashMap::new(),
            capacity,
            refill_rate,
        }
    }

    pub fn check(&self, participant_id: &ParticipantId) -> Result<(), AppError> {
        self.check_at(participant_id, Instant::now())
    }

    pub fn check_at(&self, participant_id: &ParticipantId, now: Instant) -> Result<(), AppError> {
        let mut bucket = self
            .buckets
            .entry(*participant_id)
            .or_insert_with(|| Bucket::new(self.capacity, self.refill_rate, now));

        if bucket.allow_request(now) {
            Ok(())
        } else {
            Err(AppError::RateLimitExceeded(format!(
                "more than {} frames in a burst",
                self.capacity
            )))
        }
    }

    /// Drop a participant's bucket when their socket closes
    pub fn forget(&self, participant_id: &ParticipantId) {
        self.buckets.remove(participant_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_burst_then_throttle() {
        let limiter = RateLimiter::new(3, 1.0);
        let p1 = ParticipantId::new();
        let now = Instant::now();

        for _ in 0..3 {
            assert!(limiter.check_at(&p1, now).is_ok());
        }
        assert!(matches!(
            limiter.check_at(&p1, now),
            Err(AppError::RateLimitExceeded(_))
        ));

        // One token back after a second
        let later = now + Duration::from_secs(1);
        assert!(limiter.check_at(&p1, later).is_ok());
        assert!(limiter.check_at(&p1, later).is_err());
    }

    #[test]
    fn test_buckets_are_per_participant() {
        let limiter = RateLimiter::new(1, 0.0);
        let now = Instant::now();
        let p1 = ParticipantId::new();
        let p2 = ParticipantId::new();

        assert!(limiter.check_at(&p1, now).is_ok());
        assert!(limiter.check_at(&p1, now).is_err());
        assert!(limiter.check_at(&p2, now).is_ok());

        limiter.forget(&p1);
        assert!(limiter.check_at(&p1, now).is_ok());
    }
}
