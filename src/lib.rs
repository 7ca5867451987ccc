//! In-Memory Key-Value Service Library
//!
//! This library crate defines the modules behind the `memkv` binary (`main.rs`): a volatile
//! string key-value store served over HTTP, optionally guarded by a global rate limiter.
//!
//! ## Architecture Modules
//! - **`store`**: The concurrent `KvStore` plus its HTTP handlers and JSON protocol.
//! - **`limiter`**: A lazily-refilled token bucket and the axum layer that applies it to
//!   every request before any store operation runs.
//! - **`server`**: Route table, access logging, listener binding and graceful shutdown.
//! - **`config`**: Command-line / environment configuration.
//! - **`error`**: Store outcomes and their mapping to HTTP status codes.

pub mod config;
pub mod error;
pub mod limiter;
pub mod server;
pub mod store;
