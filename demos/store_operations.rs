//! Store operations demo: fills two namespaces with pseudo-random vectors,
//! then walks through searches, overwrites and listing with timings.
//!
//! Run with: cargo run --release --example store_operations

use embeddb::VectorStore;
use serde_json::Map;
use std::time::Instant;

fn random_vector(dim: usize, seed: u64) -> Vec<f32> {
    let mut state = seed;
    (0..dim)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 33) as f32) / (u32::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

fn main() {
    let dim = 384;
    let per_namespace = 5_000;

    // === Phase 1: Fill two namespaces ===
    println!("=== Phase 1: Store {} vectors into each of two namespaces ===\n", per_namespace);
    let store = VectorStore::new();
    let start = Instant::now();
    for i in 0..per_namespace {
        store.store("articles", format!("vec_{}", i), random_vector(dim, i as u64), Map::new());
        store.store("comments", format!("vec_{}", i), random_vector(dim, (100_000 + i) as u64), Map::new());
    }
    let elapsed = start.elapsed();
    println!("Stored {} vectors in {:.3}s ({:.0} stores/s)\n",
        store.total(), elapsed.as_secs_f64(),
        store.total() as f64 / elapsed.as_secs_f64());

    // === Phase 2: 10 searches against "articles" ===
    println!("=== Phase 2: 10 Searches ===\n");
    let search_queries: Vec<Vec<f32>> = (0..10)
        .map(|i| random_vector(dim, 900_000 + i))
        .collect();

    for (i, query) in search_queries.iter().enumerate() {
        let start = Instant::now();
        let results = store.search("articles", query, 5, 0.0).unwrap();
        let elapsed = start.elapsed();

        println!("Search {}/10 ({:.3}ms):", i + 1, elapsed.as_secs_f64() * 1000.0);
        for (rank, result) in results.iter().enumerate() {
            println!("  {}. {} (score: {:.6})", rank + 1, result.key, result.score);
        }
        println!();
    }

    // === Phase 3: 10 overwrites ===
    println!("=== Phase 3: 10 Overwrites ===\n");
    let count_before = store.count("articles");
    for i in 0..10 {
        let key = format!("vec_{}", i * 500); // Overwrite vec_0, vec_500, vec_1000, ...
        let vec = random_vector(dim, 800_000 + i);
        let start = Instant::now();
        store.store("articles", key.clone(), vec, Map::new());
        let elapsed = start.elapsed();
        println!("Overwrite {}/10: {} ({:.3}ms)", i + 1, key, elapsed.as_secs_f64() * 1000.0);
    }
    println!("\nCount: {} -> {} (overwrites add nothing)\n", count_before, store.count("articles"));

    // === Phase 4: Same searches after the overwrites ===
    println!("=== Phase 4: 10 Searches (after overwrites) ===\n");
    for (i, query) in search_queries.iter().enumerate() {
        let start = Instant::now();
        let results = store.search("articles", query, 5, 0.0).unwrap();
        let elapsed = start.elapsed();

        println!("Search {}/10 ({:.3}ms):", i + 1, elapsed.as_secs_f64() * 1000.0);
        for (rank, result) in results.iter().enumerate() {
            println!("  {}. {} (score: {:.6})", rank + 1, result.key, result.score);
        }
        println!();
    }

    // === Phase 5: Listing ===
    println!("=== Phase 5: Listing ===\n");
    let listed = store.list("comments", 5);
    println!("First {} of '{}':", listed.len(), "comments");
    for entry in &listed {
        println!("  {} ({} dims)", entry.key, entry.embedding.len());
    }

    println!("\n=== Summary ===");
    for namespace in store.namespaces() {
        println!("{}: {} vectors", namespace, store.count(&namespace));
    }
}
