use crate::{
    cache::{hash_from_url, path_from_hash},
    types::{CachePathQuery, CachePathResponse},
};
use axum::{Json, extract::Query};

/// Report the content-addressed cache location of a URL.
pub async fn get_cache_path(Query(query): Query<CachePathQuery>) -> Json<CachePathResponse> {
    let hash = hash_from_url(&query.url);
    let path = path_from_hash(&hash);
    Json(CachePathResponse {
        url: query.url,
        hash,
        path,
    })
}
