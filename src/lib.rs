//! Deduplicating Key-Value Server Library
//!
//! A single-node, in-memory key-value store whose Get/Put/Append operations execute
//! exactly once even when the network delivers a request several times.
//!
//! ## Modules
//! - **`storage`**: The core. `KvStore` keeps the data plus one dedup record per client
//!   and answers retransmissions from cache. Also holds the wire DTOs and HTTP handlers.
//! - **`client`**: The `Clerk`, which numbers operations and retries them until answered,
//!   and the `KvTransport` it sends through.
//! - **`server`**: Router construction and the serve loop for the `kv-server` binary.
//! - **`config`**: Command-line configuration of the binary.

pub mod client;
pub mod config;
pub mod server;
pub mod storage;
