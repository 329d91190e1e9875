use serde::{Deserialize, Serialize};

/// Identifies a logical client session across retries.
///
/// Assigned by the caller and trusted as-is. Serialized as a bare integer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClientId(pub i64);

impl ClientId {
    /// Picks a random id for a new client session.
    pub fn random() -> Self {
        Self(rand::random::<i64>())
    }
}

/// Per-client sequence number of a logical operation.
///
/// Every network attempt of the same operation carries the same number; the next
/// operation of that client carries a strictly greater one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeqNum(pub i64);

impl SeqNum {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// The latest operation executed for a client together with the reply it produced.
///
/// Only one record is kept per client: a client never has two operations in flight,
/// so once it moves on the previous reply can no longer be asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupRecord {
    pub seq: SeqNum,
    pub reply: String,
}

impl DedupRecord {
    /// True when `seq` is not newer than the recorded one, i.e. a retransmission.
    pub fn covers(&self, seq: SeqNum) -> bool {
        seq <= self.seq
    }
}

/// Counters reported by `KvStore::stats`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KvStats {
    /// Number of keys currently stored.
    pub keys: usize,
    /// Number of clients with a dedup record.
    pub clients: usize,
}
