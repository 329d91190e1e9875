//! Storage Module Tests
//!
//! Validates the deduplication rules of `KvStore`.
//!
//! ## Test Scopes
//! - **Operations**: Get/Put/Append semantics, including absent keys.
//! - **Deduplication**: retransmitted requests are answered from cache and never reapplied.
//! - **Concurrency**: duplicate deliveries racing each other apply exactly once.
//!
//! *Note: the HTTP surface is exercised by the integration tests under `tests/`.*

#[cfg(test)]
mod tests {
    use crate::storage::memory::KvStore;
    use crate::storage::protocol::{GetRequest, PutAppendRequest};
    use crate::storage::types::{ClientId, DedupRecord, SeqNum};
    use std::sync::Arc;

    const C1: ClientId = ClientId(1);
    const C2: ClientId = ClientId(2);

    // ============================================================
    // BASIC OPERATIONS
    // ============================================================

    #[tokio::test]
    async fn test_get_absent_key_returns_empty_string() {
        let store = KvStore::new();

        let value = store.get(C1, SeqNum(1), "missing").await;

        assert_eq!(value, "");
        assert_eq!(store.peek("missing").await, None, "Get must not create the key");
    }

    #[tokio::test]
    async fn test_put_overwrites_and_replies_with_new_value() {
        let store = KvStore::new();

        assert_eq!(store.put(C1, SeqNum(1), "k", "first").await, "first");
        assert_eq!(store.put(C1, SeqNum(2), "k", "second").await, "second");

        assert_eq!(store.peek("k").await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_append_to_absent_key_behaves_like_put() {
        let store = KvStore::new();

        let old = store.append(C1, SeqNum(1), "k", "abc").await;

        assert_eq!(old, "");
        assert_eq!(store.peek("k").await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_get_reads_other_clients_writes() {
        let store = KvStore::new();
        store.put(C1, SeqNum(1), "shared", "v1").await;

        assert_eq!(store.get(C2, SeqNum(1), "shared").await, "v1");
    }

    // ============================================================
    // SCENARIOS
    // ============================================================

    #[tokio::test]
    async fn test_put_append_get_scenario() {
        let store = KvStore::new();

        // Scenario 1: put, then identical redelivery
        assert_eq!(store.put(C1, SeqNum(1), "x", "a").await, "a");
        assert_eq!(store.peek("x").await.as_deref(), Some("a"));
        assert_eq!(store.put(C1, SeqNum(1), "x", "a").await, "a");
        assert_eq!(store.peek("x").await.as_deref(), Some("a"));

        // Scenario 2: append replies with the pre-append value, redelivery is not reapplied
        assert_eq!(store.append(C1, SeqNum(2), "x", "b").await, "a");
        assert_eq!(store.peek("x").await.as_deref(), Some("ab"));
        assert_eq!(store.append(C1, SeqNum(2), "x", "b").await, "a");
        assert_eq!(store.peek("x").await.as_deref(), Some("ab"));

        // Scenario 3: another client reads without disturbing client 1
        assert_eq!(store.get(C2, SeqNum(1), "x").await, "ab");
        assert_eq!(store.last_seq(C1).await, Some(SeqNum(2)));

        // Scenario 4: a newer sequence number executes again
        assert_eq!(store.append(C1, SeqNum(3), "x", "c").await, "ab");
        assert_eq!(store.peek("x").await.as_deref(), Some("abc"));
    }

    // ============================================================
    // DEDUPLICATION
    // ============================================================

    #[tokio::test]
    async fn test_cached_append_reply_is_pre_append_snapshot() {
        let store = KvStore::new();
        store.put(C1, SeqNum(1), "k", "base").await;
        store.append(C1, SeqNum(2), "k", "-tail").await;

        // Another client changes the key after the append executed
        store.put(C2, SeqNum(1), "k", "replaced").await;

        let replay = store.append(C1, SeqNum(2), "k", "-tail").await;
        assert_eq!(replay, "base", "Replay must return the snapshot taken at first execution");
        assert_eq!(store.peek("k").await.as_deref(), Some("replaced"));
    }

    #[tokio::test]
    async fn test_duplicate_get_returns_cached_value_after_concurrent_write() {
        let store = KvStore::new();
        store.put(C2, SeqNum(1), "k", "old").await;

        assert_eq!(store.get(C1, SeqNum(1), "k").await, "old");
        store.put(C2, SeqNum(2), "k", "new").await;

        assert_eq!(store.get(C1, SeqNum(1), "k").await, "old");
        assert_eq!(store.get(C1, SeqNum(2), "k").await, "new");
    }

    #[tokio::test]
    async fn test_sequence_is_shared_across_operation_types() {
        let store = KvStore::new();
        store.put(C1, SeqNum(5), "k", "v").await;

        // A get carrying an already executed sequence number is a duplicate of the put
        let reply = store.get(C1, SeqNum(5), "other").await;
        assert_eq!(reply, "v");
    }

    #[tokio::test]
    async fn test_stale_sequence_replies_with_latest_cached_result() {
        let store = KvStore::new();
        store.put(C1, SeqNum(1), "k", "one").await;
        store.append(C1, SeqNum(2), "k", "two").await;

        let reply = store.put(C1, SeqNum(1), "k", "one").await;

        assert_eq!(reply, "one", "Only the latest reply (append of seq 2) is retained");
        assert_eq!(store.peek("k").await.as_deref(), Some("onetwo"));
    }

    #[tokio::test]
    async fn test_repeated_deliveries_match_single_delivery() {
        let once = KvStore::new();
        let many = KvStore::new();

        let ops: Vec<(i64, &str, &str)> = vec![(1, "a", "x"), (2, "a", "y"), (3, "b", "z")];
        for (seq, key, value) in &ops {
            once.append(C1, SeqNum(*seq), key, value).await;
        }

        for (seq, key, value) in &ops {
            let first = many.append(C1, SeqNum(*seq), key, value).await;
            for _ in 0..5 {
                assert_eq!(many.append(C1, SeqNum(*seq), key, value).await, first);
            }
        }

        for key in ["a", "b"] {
            assert_eq!(once.peek(key).await, many.peek(key).await);
        }
    }

    #[tokio::test]
    async fn test_dedup_state_is_one_record_per_client() {
        let store = KvStore::new();

        for seq in 1..=100 {
            store.append(C1, SeqNum(seq), "log", ".").await;
        }
        store.get(C2, SeqNum(1), "log").await;

        let stats = store.stats().await;
        assert_eq!(stats.clients, 2);
        assert_eq!(stats.keys, 1);
        assert_eq!(store.last_seq(C1).await, Some(SeqNum(100)));
        assert_eq!(store.last_seq(ClientId(99)).await, None);
    }

    #[test]
    fn test_dedup_record_covers_not_newer_sequences() {
        let record = DedupRecord {
            seq: SeqNum(7),
            reply: "r".to_string(),
        };

        assert!(record.covers(SeqNum(6)));
        assert!(record.covers(SeqNum(7)));
        assert!(!record.covers(SeqNum(8)));
    }

    // ============================================================
    // CONCURRENCY
    // ============================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_appends_apply_once() {
        let store = Arc::new(KvStore::new());
        store.put(C1, SeqNum(1), "x", "a").await;

        let mut handles = Vec::new();
        for _ in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(C1, SeqNum(2), "x", "b").await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), "a");
        }
        assert_eq!(store.peek("x").await.as_deref(), Some("ab"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_clients_each_apply_once() {
        let store = Arc::new(KvStore::new());
        let clients = 16;
        let ops_per_client = 20;

        let mut handles = Vec::new();
        for c in 0..clients {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for seq in 1..=ops_per_client {
                    // Every operation is delivered three times
                    for _ in 0..3 {
                        store.append(ClientId(c), SeqNum(seq), "log", "x").await;
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let log = store.peek("log").await.unwrap();
        assert_eq!(log.len(), (clients * ops_per_client) as usize);
    }

    // ============================================================
    // PROTOCOL
    // ============================================================

    #[test]
    fn test_requests_serialize_ids_as_plain_integers() {
        let req = PutAppendRequest {
            client_id: ClientId(42),
            seq: SeqNum(3),
            key: "k".to_string(),
            value: "v".to_string(),
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"client_id": 42, "seq": 3, "key": "k", "value": "v"})
        );

        let get: GetRequest =
            serde_json::from_str(r#"{"client_id": -7, "seq": 1, "key": "k"}"#).unwrap();
        assert_eq!(get.client_id, ClientId(-7));
        assert_eq!(get.seq, SeqNum(1));
    }
}
