use super::types::{ClientId, DedupRecord, KvStats, SeqNum};

use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-memory key-value store with per-client request deduplication.
///
/// Every operation runs inside one critical section covering the duplicate check,
/// the read or mutation, and the update of the client's dedup record. A request whose
/// sequence number is not newer than the last one executed for its client is answered
/// from the cached reply and never touches the data.
#[derive(Debug, Default)]
pub struct KvStore {
    state: Mutex<KvState>,
}

#[derive(Debug, Default)]
struct KvState {
    data: HashMap<String, String>,
    clients: HashMap<ClientId, DedupRecord>,
}

impl KvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, or an empty string if it was never written.
    pub async fn get(&self, client_id: ClientId, seq: SeqNum, key: &str) -> String {
        self.execute(client_id, seq, "get", |data| {
            data.get(key).cloned().unwrap_or_default()
        })
        .await
    }

    /// Overwrites `key` with `value` and replies with the new value.
    pub async fn put(&self, client_id: ClientId, seq: SeqNum, key: &str, value: &str) -> String {
        self.execute(client_id, seq, "put", |data| {
            data.insert(key.to_string(), value.to_string());
            value.to_string()
        })
        .await
    }

    /// Appends `value` to `key` and replies with the value held before the append.
    ///
    /// An absent key counts as the empty string, so the first append acts like a put.
    pub async fn append(
        &self,
        client_id: ClientId,
        seq: SeqNum,
        key: &str,
        value: &str,
    ) -> String {
        self.execute(client_id, seq, "append", |data| {
            let current = data.entry(key.to_string()).or_default();
            let old = current.clone();
            current.push_str(value);
            old
        })
        .await
    }

    /// Reads a value without recording anything for a client.
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.state.lock().await.data.get(key).cloned()
    }

    /// The latest sequence number executed for `client_id`, if any.
    pub async fn last_seq(&self, client_id: ClientId) -> Option<SeqNum> {
        self.state
            .lock()
            .await
            .clients
            .get(&client_id)
            .map(|record| record.seq)
    }

    pub async fn stats(&self) -> KvStats {
        let state = self.state.lock().await;
        KvStats {
            keys: state.data.len(),
            clients: state.clients.len(),
        }
    }

    async fn execute<F>(&self, client_id: ClientId, seq: SeqNum, op: &str, apply: F) -> String
    where
        F: FnOnce(&mut HashMap<String, String>) -> String,
    {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if let Some(record) = state.clients.get(&client_id)
            && record.covers(seq)
        {
            tracing::debug!(
                "{}: duplicate request from client {} (seq {}, last {}), replying from cache",
                op,
                client_id.0,
                seq.0,
                record.seq.0
            );
            return record.reply.clone();
        }

        let reply = apply(&mut state.data);
        state.clients.insert(
            client_id,
            DedupRecord {
                seq,
                reply: reply.clone(),
            },
        );
        tracing::debug!("{}: applied for client {} (seq {})", op, client_id.0, seq.0);

        reply
    }
}
