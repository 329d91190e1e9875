use axum::{Json, extract::Extension, http::StatusCode};
use std::sync::Arc;

use super::memory::KvStore;
use super::protocol::{GetReply, GetRequest, PutAppendReply, PutAppendRequest, StatsResponse};

pub async fn handle_get(
    Extension(store): Extension<Arc<KvStore>>,
    Json(req): Json<GetRequest>,
) -> (StatusCode, Json<GetReply>) {
    let value = store.get(req.client_id, req.seq, &req.key).await;
    (StatusCode::OK, Json(GetReply { value }))
}

pub async fn handle_put(
    Extension(store): Extension<Arc<KvStore>>,
    Json(req): Json<PutAppendRequest>,
) -> (StatusCode, Json<PutAppendReply>) {
    let value = store
        .put(req.client_id, req.seq, &req.key, &req.value)
        .await;
    (StatusCode::OK, Json(PutAppendReply { value }))
}

pub async fn handle_append(
    Extension(store): Extension<Arc<KvStore>>,
    Json(req): Json<PutAppendRequest>,
) -> (StatusCode, Json<PutAppendReply>) {
    let value = store
        .append(req.client_id, req.seq, &req.key, &req.value)
        .await;
    (StatusCode::OK, Json(PutAppendReply { value }))
}

pub async fn handle_stats(
    Extension(store): Extension<Arc<KvStore>>,
) -> (StatusCode, Json<StatsResponse>) {
    (StatusCode::OK, Json(store.stats().await.into()))
}
