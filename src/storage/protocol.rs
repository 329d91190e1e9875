//! Key-Value Wire Protocol
//!
//! Defines the API endpoints and Data Transfer Objects (DTOs) exchanged between
//! clerks and the server. Bodies are JSON.
//!
//! Every request carries the issuing client and the sequence number of the logical
//! operation, so a retransmitted request can be recognised and answered from cache.

use super::types::{ClientId, KvStats, SeqNum};
use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Reads a key.
pub const ENDPOINT_GET: &str = "/get";
/// Overwrites a key.
pub const ENDPOINT_PUT: &str = "/put";
/// Appends to a key, replying with the previous value.
pub const ENDPOINT_APPEND: &str = "/append";
/// Store counters, for diagnostics.
pub const ENDPOINT_STATS: &str = "/internal/stats";

// --- Data Transfer Objects ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetRequest {
    pub client_id: ClientId,
    pub seq: SeqNum,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetReply {
    /// Empty when the key was never written.
    pub value: String,
}

/// Shared by Put and Append; the endpoint selects the operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PutAppendRequest {
    pub client_id: ClientId,
    pub seq: SeqNum,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PutAppendReply {
    /// The new value for Put, the pre-append value for Append.
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsResponse {
    pub keys: usize,
    pub clients: usize,
}

impl From<KvStats> for StatsResponse {
    fn from(stats: KvStats) -> Self {
        Self {
            keys: stats.keys,
            clients: stats.clients,
        }
    }
}
