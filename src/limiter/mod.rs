//! Admission Limiter Module
//!
//! A single process-wide token bucket guarding every HTTP route.
//!
//! ## Behaviour
//! - **Burst**: The bucket starts full with `capacity` tokens and never holds more.
//! - **Refill**: Tokens accrue continuously at `refill_per_sec`, computed lazily from
//!   monotonic time on each check (no timer task).
//! - **Admission**: Each request consumes one token; with none left it is rejected
//!   immediately with 429. There is no queueing and no per-client partitioning.
//!
//! ## Submodules
//! - **`bucket`**: The `TokenBucket` state and admission check.
//! - **`middleware`**: Axum layer that applies the bucket to incoming requests.

pub mod bucket;
pub mod middleware;
