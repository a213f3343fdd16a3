use actix_web::{web, App, HttpServer};
use embeddb::VectorStore;
use reqwest::Client;
use serde_json::json;
use std::net::TcpListener;
use tokio::time::{sleep, Duration};

/// Find a free port by binding to port 0
fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Start a server over a fresh store in the background
async fn start_server() -> (String, actix_web::dev::ServerHandle) {
    let port = free_port();
    let store = web::Data::new(VectorStore::new());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .configure(embeddb::server::config)
    })
    .bind(format!("127.0.0.1:{}", port))
    .unwrap()
    .run();
    let handle = server.handle();
    tokio::spawn(server);
    sleep(Duration::from_millis(200)).await;

    (format!("http://127.0.0.1:{}", port), handle)
}

#[actix_web::test]
async fn test_store_and_search() {
    let (base, handle) = start_server().await;
    let client = Client::new();

    // --- Store 3 vectors in namespace "ns" ---
    for (key, values) in [
        ("a", vec![1.0, 0.0]),
        ("b", vec![0.0, 1.0]),
        ("c", vec![0.7071, 0.7071]),
    ] {
        let resp = client
            .post(format!("{}/api/embeddings/store", base))
            .json(&json!({"key": key, "namespace": "ns", "embedding": values}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["key"], key);
        assert_eq!(body["namespace"], "ns");
    }

    // --- Search: [1, 0] at minScore 0.5 keeps "a" then "c", excludes "b" ---
    let resp = client
        .post(format!("{}/api/embeddings/search", base))
        .json(&json!({
            "embedding": [1.0, 0.0],
            "namespace": "ns",
            "k": 10,
            "minScore": 0.5
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 2);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["key"], "a");
    assert!((results[0]["score"].as_f64().unwrap() - 1.0).abs() < 1e-5);
    assert_eq!(results[1]["key"], "c");
    assert!((results[1]["score"].as_f64().unwrap() - 0.7071).abs() < 1e-3);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_defaults_applied() {
    let (base, handle) = start_server().await;
    let client = Client::new();

    // Store without a namespace lands in "default"
    let resp = client
        .post(format!("{}/api/embeddings/store", base))
        .json(&json!({"key": "v1", "embedding": [1.0, 0.0]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["namespace"], "default");

    // List without namespace or limit sees it
    let resp = client
        .post(format!("{}/api/embeddings/list", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["namespace"], "default");
    assert_eq!(body["embeddings"][0]["key"], "v1");

    // Search with only an embedding uses namespace "default", k 10, minScore 0.5
    let resp = client
        .post(format!("{}/api/embeddings/search", base))
        .json(&json!({"embedding": [1.0, 0.0]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["key"], "v1");

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_namespace_isolation() {
    let (base, handle) = start_server().await;
    let client = Client::new();

    client
        .post(format!("{}/api/embeddings/store", base))
        .json(&json!({"key": "doc", "namespace": "left", "embedding": [1.0, 0.0]}))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{}/api/embeddings/store", base))
        .json(&json!({"key": "doc", "namespace": "right", "embedding": [0.0, 1.0]}))
        .send()
        .await
        .unwrap();

    // Search "left" for [0, 1]: its only entry is orthogonal, so nothing
    let resp = client
        .post(format!("{}/api/embeddings/search", base))
        .json(&json!({"embedding": [0.0, 1.0], "namespace": "left", "minScore": 0.5}))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 0);

    // The same query against "right" finds its entry
    let resp = client
        .post(format!("{}/api/embeddings/search", base))
        .json(&json!({"embedding": [0.0, 1.0], "namespace": "right", "minScore": 0.5}))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 1);

    // Each namespace lists exactly one entry
    for namespace in ["left", "right"] {
        let resp = client
            .post(format!("{}/api/embeddings/list", base))
            .json(&json!({"namespace": namespace}))
            .send()
            .await
            .unwrap();
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["count"], 1);
    }

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_store_duplicate_key_overwrites() {
    let (base, handle) = start_server().await;
    let client = Client::new();

    client
        .post(format!("{}/api/embeddings/store", base))
        .json(&json!({"key": "dup", "namespace": "ns", "embedding": [1.0, 0.0]}))
        .send()
        .await
        .unwrap();

    // Store again with the same key - should overwrite, not duplicate
    let resp = client
        .post(format!("{}/api/embeddings/store", base))
        .json(&json!({
            "key": "dup",
            "namespace": "ns",
            "embedding": [0.0, 1.0],
            "metadata": {"rev": 2}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Exactly one entry, reflecting the latest write
    let resp = client
        .post(format!("{}/api/embeddings/list", base))
        .json(&json!({"namespace": "ns"}))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 1);
    let entry = &body["embeddings"][0];
    assert_eq!(entry["embedding"][0], 0.0);
    assert_eq!(entry["metadata"]["rev"], 2);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_metadata_returned_by_search() {
    let (base, handle) = start_server().await;
    let client = Client::new();

    client
        .post(format!("{}/api/embeddings/store", base))
        .json(&json!({
            "key": "doc",
            "namespace": "ns",
            "embedding": [1.0, 0.0],
            "metadata": {"title": "intro", "page": 3}
        }))
        .send()
        .await
        .unwrap();

    let resp = client
        .post(format!("{}/api/embeddings/search", base))
        .json(&json!({"embedding": [1.0, 0.0], "namespace": "ns"}))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    let result = &body["results"][0];
    assert_eq!(result["metadata"]["title"], "intro");
    assert_eq!(result["metadata"]["page"], 3);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_search_empty_namespace() {
    let (base, handle) = start_server().await;
    let client = Client::new();

    // A namespace nobody ever wrote to is a valid empty result, not an error
    let resp = client
        .post(format!("{}/api/embeddings/search", base))
        .json(&json!({"embedding": [1.0, 0.0], "namespace": "nowhere"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 0);
    assert!(body["results"].as_array().unwrap().is_empty());

    let resp = client
        .post(format!("{}/api/embeddings/list", base))
        .json(&json!({"namespace": "nowhere"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 0);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_request_validation() {
    let (base, handle) = start_server().await;
    let client = Client::new();

    // Empty key on store
    let resp = client
        .post(format!("{}/api/embeddings/store", base))
        .json(&json!({"key": "", "embedding": [1.0]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Empty embedding on store
    let resp = client
        .post(format!("{}/api/embeddings/store", base))
        .json(&json!({"key": "v1", "embedding": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Empty query on search
    let resp = client
        .post(format!("{}/api/embeddings/search", base))
        .json(&json!({"embedding": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // k out of bounds
    for k in [0, 101] {
        let resp = client
            .post(format!("{}/api/embeddings/search", base))
            .json(&json!({"embedding": [1.0], "k": k}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
    }

    // minScore out of bounds
    let resp = client
        .post(format!("{}/api/embeddings/search", base))
        .json(&json!({"embedding": [1.0], "minScore": 1.5}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // limit out of bounds
    for limit in [0, 20_000] {
        let resp = client
            .post(format!("{}/api/embeddings/list", base))
            .json(&json!({"limit": limit}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
    }

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_dimension_mismatch_fails_search() {
    let (base, handle) = start_server().await;
    let client = Client::new();

    client
        .post(format!("{}/api/embeddings/store", base))
        .json(&json!({"key": "v1", "namespace": "ns", "embedding": [1.0, 0.0, 0.0]}))
        .send()
        .await
        .unwrap();

    // 2-dimensional query against a 3-dimensional entry
    let resp = client
        .post(format!("{}/api/embeddings/search", base))
        .json(&json!({"embedding": [1.0, 0.0], "namespace": "ns"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("dimension mismatch"));

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_health() {
    let (base, handle) = start_server().await;
    let client = Client::new();

    let resp = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["entries"], 0);

    client
        .post(format!("{}/api/embeddings/store", base))
        .json(&json!({"key": "v1", "namespace": "ns", "embedding": [1.0]}))
        .send()
        .await
        .unwrap();

    let resp = client.get(format!("{}/health", base)).send().await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["namespaces"], 1);
    assert_eq!(body["entries"], 1);

    handle.stop(true).await;
}
