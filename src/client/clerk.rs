use super::transport::KvTransport;
use crate::storage::protocol::{GetRequest, PutAppendRequest};
use crate::storage::types::{ClientId, SeqNum};

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// How a clerk waits between attempts of the same operation.
///
/// The delay starts at `base_delay`, doubles after every failure up to `max_delay`,
/// and gets a little random jitter on top.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// `None` retries until a reply arrives.
    pub max_attempts: Option<usize>,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            base_delay: Duration::from_millis(150),
            max_delay: Duration::from_millis(1200),
        }
    }
}

impl RetryPolicy {
    pub fn bounded(max_attempts: usize) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            ..Default::default()
        }
    }

    pub fn with_delays(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    /// Delay before retrying after the `attempt`-th failure (0-based), without jitter.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(31) as u32);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Random extra wait, at most 50 ms and never more than `base_delay`.
    fn jitter(&self) -> Duration {
        let cap_ms = self.base_delay.as_millis().min(50) as u64;
        if cap_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::random::<u64>() % cap_ms)
    }

    fn is_exhausted(&self, attempts: usize) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// Client session issuing Get/Put/Append against a deduplicating server.
///
/// Each logical operation takes a fresh sequence number once and then resends the
/// identical request until some attempt is answered. Operations take `&mut self`, so a
/// clerk never has two requests in flight; the server's single cached reply per client
/// relies on that.
pub struct Clerk<T> {
    transport: T,
    client_id: ClientId,
    last_seq: SeqNum,
    retry: RetryPolicy,
}

impl<T: KvTransport> Clerk<T> {
    /// Starts a session under a random client id.
    pub fn new(transport: T) -> Self {
        Self::with_client_id(transport, ClientId::random())
    }

    pub fn with_client_id(transport: T, client_id: ClientId) -> Self {
        Self {
            transport,
            client_id,
            last_seq: SeqNum(0),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Sequence number of the most recently issued operation (0 before the first).
    pub fn last_seq(&self) -> SeqNum {
        self.last_seq
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches the current value of `key`; empty if the key does not exist.
    pub async fn get(&mut self, key: &str) -> Result<String> {
        let req = GetRequest {
            client_id: self.client_id,
            seq: self.next_seq(),
            key: key.to_string(),
        };

        let reply = self
            .call_with_retry("get", || self.transport.get(&req))
            .await?;
        Ok(reply.value)
    }

    /// Sets `key` to `value`; returns the value stored.
    pub async fn put(&mut self, key: &str, value: &str) -> Result<String> {
        let req = self.put_append_request(key, value);

        let reply = self
            .call_with_retry("put", || self.transport.put(&req))
            .await?;
        Ok(reply.value)
    }

    /// Appends `value` to `key`; returns the value held before the append.
    pub async fn append(&mut self, key: &str, value: &str) -> Result<String> {
        let req = self.put_append_request(key, value);

        let reply = self
            .call_with_retry("append", || self.transport.append(&req))
            .await?;
        Ok(reply.value)
    }

    fn next_seq(&mut self) -> SeqNum {
        self.last_seq = self.last_seq.next();
        self.last_seq
    }

    fn put_append_request(&mut self, key: &str, value: &str) -> PutAppendRequest {
        PutAppendRequest {
            client_id: self.client_id,
            seq: self.next_seq(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    async fn call_with_retry<R, F, Fut>(&self, op: &str, mut attempt_fn: F) -> Result<R>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let mut attempts = 0usize;

        loop {
            match attempt_fn().await {
                Ok(reply) => {
                    if attempts > 0 {
                        tracing::debug!(
                            "{} (seq {}) answered after {} retries",
                            op,
                            self.last_seq.0,
                            attempts
                        );
                    }
                    return Ok(reply);
                }
                Err(e) => {
                    let delay = self.retry.backoff(attempts);
                    attempts += 1;

                    if self.retry.is_exhausted(attempts) {
                        return Err(e.context(format!(
                            "{} (seq {}): retry attempts exhausted after {}",
                            op, self.last_seq.0, attempts
                        )));
                    }

                    tracing::warn!(
                        "{} (seq {}) attempt {} failed: {}",
                        op,
                        self.last_seq.0,
                        attempts,
                        e
                    );

                    tokio::time::sleep(delay + self.retry.jitter()).await;
                }
            }
        }
    }
}
