//! Global token bucket.
//!
//! The bucket holds a real-valued token count in `[0, capacity]`. There is no background
//! refill task: every admission check first credits `elapsed * refill_per_sec` tokens,
//! then tries to take one. Both steps run under the same lock, so the last token can only
//! be taken once.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use anyhow::{Result, bail};

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

pub struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Creates a full bucket.
    ///
    /// # param:
    /// * capacity: burst size, at least 1
    /// * refill_per_sec: tokens added per second, finite and greater than 0
    pub fn new(capacity: u32, refill_per_sec: f64) -> Result<Self> {
        Self::check_params(capacity, refill_per_sec)?;

        let capacity = capacity as f64;
        Ok(Self {
            capacity,
            refill_per_sec,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        })
    }

    /// Validates bucket parameters without building a bucket.
    pub fn check_params(capacity: u32, refill_per_sec: f64) -> Result<()> {
        if capacity == 0 {
            bail!("rate limit capacity must be at least 1");
        }
        if !refill_per_sec.is_finite() || refill_per_sec <= 0.0 {
            bail!("rate limit refill rate must be a positive number, got {refill_per_sec}");
        }
        Ok(())
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn refill_per_sec(&self) -> f64 {
        self.refill_per_sec
    }

    /// Takes one token if available. Never blocks beyond the internal lock.
    pub fn try_admit(&self) -> bool {
        self.try_admit_at(Instant::now())
    }

    /// Same as [`try_admit`](Self::try_admit), evaluated at `now`.
    pub fn try_admit_at(&self, now: Instant) -> bool {
        let mut state = self.lock_state();
        self.refill(&mut state, now);

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Tokens currently available, after crediting elapsed time.
    pub fn available(&self) -> f64 {
        self.available_at(Instant::now())
    }

    pub fn available_at(&self, now: Instant) -> f64 {
        let mut state = self.lock_state();
        self.refill(&mut state, now);
        state.tokens
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        // An instant older than the last refill credits nothing and keeps the clock.
        let elapsed = now.saturating_duration_since(state.last_refill);
        if elapsed.is_zero() {
            return;
        }

        let credited = elapsed.as_secs_f64() * self.refill_per_sec;
        state.tokens = (state.tokens + credited).min(self.capacity);
        state.last_refill = now;
    }

    fn lock_state(&self) -> MutexGuard<'_, BucketState> {
        // The critical section cannot panic midway, so a poisoned state is still consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for TokenBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBucket")
            .field("capacity", &self.capacity)
            .field("refill_per_sec", &self.refill_per_sec)
            .finish()
    }
}
