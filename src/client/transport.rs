//! Request Transport
//!
//! A transport delivers one attempt of a request and returns the reply, or fails if
//! the attempt got no answer. It never retries; that is the clerk's job.

use crate::storage::protocol::{
    ENDPOINT_APPEND, ENDPOINT_GET, ENDPOINT_PUT, GetReply, GetRequest, PutAppendReply,
    PutAppendRequest,
};

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Per-attempt timeout used by `HttpTransport::new`.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(500);

/// One network attempt per call.
#[async_trait]
pub trait KvTransport: Send + Sync {
    async fn get(&self, req: &GetRequest) -> Result<GetReply>;
    async fn put(&self, req: &PutAppendRequest) -> Result<PutAppendReply>;
    async fn append(&self, req: &PutAppendRequest) -> Result<PutAppendReply>;
}

/// JSON over HTTP, talking to the router built by `server::router`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// `addr` is either `host:port` or a full `http://` base URL.
    pub fn new(addr: &str) -> Self {
        Self::with_timeout(addr, DEFAULT_ATTEMPT_TIMEOUT)
    }

    pub fn with_timeout(addr: &str, timeout: Duration) -> Self {
        let cleaned = addr.trim_end_matches('/');
        let base_url = if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
            cleaned.to_string()
        } else {
            format!("http://{}", cleaned)
        };

        Self {
            base_url,
            http_client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req, Resp>(&self, endpoint: &str, payload: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, endpoint))
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "{} failed with status {}",
                endpoint,
                response.status()
            ));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl KvTransport for HttpTransport {
    async fn get(&self, req: &GetRequest) -> Result<GetReply> {
        self.post(ENDPOINT_GET, req).await
    }

    async fn put(&self, req: &PutAppendRequest) -> Result<PutAppendReply> {
        self.post(ENDPOINT_PUT, req).await
    }

    async fn append(&self, req: &PutAppendRequest) -> Result<PutAppendReply> {
        self.post(ENDPOINT_APPEND, req).await
    }
}
