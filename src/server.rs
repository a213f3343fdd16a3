//! REST API for embeddb.
//!
//! Provides JSON endpoints over a single shared in-memory [`VectorStore`].
//! State lives for the lifetime of the process: there is nothing on disk,
//! and a restart starts empty. Request bounds (`limit`, `k`, `minScore`,
//! non-empty key) are enforced here, at the edge; the store itself accepts
//! whatever it is handed.
//!
//! ## Endpoints
//!
//! - `POST /api/embeddings/store` - Insert or overwrite a vector
//! - `POST /api/embeddings/list` - List a namespace's vectors
//! - `POST /api/embeddings/search` - Rank a namespace by cosine similarity
//! - `GET /health` - Liveness plus store counts
//!
//! ## Usage
//!
//! ```rust,no_run
//! use actix_web::{web, App, HttpServer};
//! use embeddb::VectorStore;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let store = web::Data::new(VectorStore::new());
//!     HttpServer::new(move || {
//!         App::new()
//!             .app_data(store.clone())
//!             .configure(embeddb::server::config)
//!     })
//!     .bind("0.0.0.0:7878")?
//!     .run()
//!     .await
//! }
//! ```

use actix_web::{web, HttpResponse, Responder};
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::store::{Entry, VectorStore, DEFAULT_NAMESPACE};

const LIMIT_MAX: usize = 10_000;
const K_MAX: usize = 100;

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_limit() -> usize {
    1000
}

fn default_k() -> usize {
    10
}

fn default_min_score() -> f32 {
    0.5
}

// --- Request structs ---

#[derive(Deserialize)]
struct StoreRequest {
    key: String,
    #[serde(default = "default_namespace")]
    namespace: String,
    embedding: Vec<f32>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct ListRequest {
    #[serde(default = "default_namespace")]
    namespace: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

#[derive(Deserialize)]
struct SearchRequest {
    embedding: Vec<f32>,
    #[serde(default = "default_namespace")]
    namespace: String,
    #[serde(default = "default_k")]
    k: usize,
    #[serde(rename = "minScore", default = "default_min_score")]
    min_score: f32,
}

// --- Response structs ---

#[derive(Serialize)]
struct StoreResponse {
    success: bool,
    key: String,
    namespace: String,
}

#[derive(Serialize)]
struct ListResponse {
    embeddings: Vec<Entry>,
    count: usize,
    namespace: String,
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<crate::similarity::SearchMatch>,
    count: usize,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    namespaces: usize,
    entries: usize,
}

fn bad_request(message: String) -> HttpResponse {
    warn!(%message, "rejected request");
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

// --- Handlers ---

async fn store_handler(
    store: web::Data<VectorStore>,
    body: web::Json<StoreRequest>,
) -> impl Responder {
    let body = body.into_inner();

    if body.key.is_empty() {
        return bad_request("key must not be empty".to_string());
    }
    if body.embedding.is_empty() {
        return bad_request("embedding must not be empty".to_string());
    }

    store.store(
        &body.namespace,
        body.key.clone(),
        body.embedding,
        body.metadata.unwrap_or_default(),
    );

    HttpResponse::Ok().json(StoreResponse {
        success: true,
        key: body.key,
        namespace: body.namespace,
    })
}

async fn list_handler(
    store: web::Data<VectorStore>,
    body: web::Json<ListRequest>,
) -> impl Responder {
    let body = body.into_inner();

    if body.limit < 1 || body.limit > LIMIT_MAX {
        return bad_request(format!("limit must be between 1 and {}", LIMIT_MAX));
    }

    let embeddings = store.list(&body.namespace, body.limit);

    HttpResponse::Ok().json(ListResponse {
        count: embeddings.len(),
        embeddings,
        namespace: body.namespace,
    })
}

async fn search_handler(
    store: web::Data<VectorStore>,
    body: web::Json<SearchRequest>,
) -> impl Responder {
    let body = body.into_inner();

    if body.k < 1 || body.k > K_MAX {
        return bad_request(format!("k must be between 1 and {}", K_MAX));
    }
    if !(0.0..=1.0).contains(&body.min_score) {
        return bad_request("minScore must be between 0.0 and 1.0".to_string());
    }

    match store.search(&body.namespace, &body.embedding, body.k, body.min_score) {
        Ok(results) => HttpResponse::Ok().json(SearchResponse {
            count: results.len(),
            results,
        }),
        // Empty query and dimension mismatch are caller bugs, not ours
        Err(e) => bad_request(e.to_string()),
    }
}

async fn health_handler(store: web::Data<VectorStore>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        namespaces: store.namespaces().len(),
        entries: store.total(),
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/embeddings/store").route(web::post().to(store_handler)))
       .service(web::resource("/api/embeddings/list").route(web::post().to(list_handler)))
       .service(web::resource("/api/embeddings/search").route(web::post().to(search_handler)))
       .service(web::resource("/health").route(web::get().to(health_handler)));
}
