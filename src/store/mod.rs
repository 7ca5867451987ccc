//! Key-Value Store Module
//!
//! A volatile, in-memory string-to-string map shared by every request handler.
//!
//! ## Core Concepts
//! - **Ownership**: `KvStore` is built once at startup and injected into the router as an
//!   `Arc<KvStore>` extension. Tests create as many isolated stores as they like.
//! - **Concurrency**: Backed by a sharded `DashMap`; single-key operations are atomic and
//!   concurrent writes to the same key resolve as last-write-wins.
//! - **Outcomes**: Absence is reported as `StoreError::NotFound`, empty input as
//!   `StoreError::InvalidArgument`. The HTTP layer maps both to 404 / 400.
//!
//! ## Submodules
//! - **`memory`**: The `KvStore` itself.
//! - **`protocol`**: Endpoint paths, query parameter structs and JSON bodies.
//! - **`handlers`**: Axum handlers for `/set`, `/get`, `/delete` and `/keys`.

pub mod handlers;
pub mod memory;
pub mod protocol;
