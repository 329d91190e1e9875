//! Deduplicating Storage Module
//!
//! Implements a single-node, in-memory key-value store that stays correct when
//! requests are delivered more than once.
//!
//! ## Core Concepts
//! - **Client sessions**: every request names its client and the sequence number of the
//!   logical operation it belongs to. Retries resend the same pair.
//! - **Dedup records**: per client, the store remembers the latest executed sequence
//!   number and its reply. Anything not newer is answered from that record.
//! - **Atomicity**: the duplicate check and the mutation run under one lock, so
//!   concurrent deliveries of the same request apply it once.
//! - **Access**: `handlers` expose `KvStore` over HTTP using the DTOs in `protocol`.

pub mod handlers;
pub mod memory;
pub mod protocol;
pub mod types;

#[cfg(test)]
mod tests;
