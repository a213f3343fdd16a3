//! Semantic search demo: a candle-backed implementation of the
//! `TextEmbedder` seam feeding the in-memory store.
//!
//! Run with: cargo run --release --example semantic_search -- "your query"

use embeddb::VectorStore;
use embeddb::embed::{check_batch, TextEmbedder};
use embeddb::error::EmbedError;
use serde_json::{Map, Value};
use std::time::Instant;

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::Tokenizer;

const MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

const CORPUS: &[(&str, &str)] = &[
    ("rust", "Rust is a systems programming language focused on safety and speed."),
    ("tokio", "Tokio is an asynchronous runtime for writing network applications."),
    ("bert", "BERT is a transformer model pretrained on large text corpora."),
    ("cosine", "Cosine similarity measures the angle between two vectors."),
    ("espresso", "Espresso is brewed by forcing hot water through finely ground coffee."),
    ("alps", "The Alps are the highest mountain range lying entirely in Europe."),
    ("sourdough", "Sourdough bread rises through wild yeast fermentation."),
    ("http", "HTTP is a request-response protocol for distributed hypermedia systems."),
];

struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dimension: usize,
}

impl BertEmbedder {
    fn load(device: Device) -> Result<Self, Box<dyn std::error::Error>> {
        let api = Api::new()?;
        let repo = api.repo(Repo::new(MODEL_ID.to_string(), RepoType::Model));

        let tokenizer_path = repo.get("tokenizer.json")?;
        let config_path = repo.get("config.json")?;
        let weights_path = repo.get("model.safetensors")?;

        let config: Config = serde_json::from_str(&std::fs::read_to_string(config_path)?)?;
        let tokenizer = Tokenizer::from_file(tokenizer_path).map_err(|e| e.to_string())?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], candle_core::DType::F32, &device)?
        };
        let dimension = config.hidden_size;
        let model = BertModel::load(vb, &config)?;

        Ok(BertEmbedder { model, tokenizer, device, dimension })
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let encoding = self.tokenizer
            .encode(text, true)
            .map_err(|e| EmbedError::Backend(e.to_string()))?;

        let vector = (|| -> candle_core::Result<Vec<f32>> {
            let ids = Tensor::from_vec(
                encoding.get_ids().to_vec(),
                (1, encoding.get_ids().len()),
                &self.device,
            )?;
            let mask = Tensor::from_vec(
                encoding.get_attention_mask().to_vec(),
                (1, encoding.get_attention_mask().len()),
                &self.device,
            )?;
            let type_ids = ids.zeros_like()?;
            let hidden = self.model.forward(&ids, &type_ids, Some(&mask))?;
            let pooled = mean_pooling(&hidden, &mask)?;
            let normalized = l2_normalize(&pooled)?;
            normalized.get(0)?.to_vec1()
        })()
        .map_err(|e| EmbedError::Backend(e.to_string()))?;

        Ok(vector)
    }
}

impl TextEmbedder for BertEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        check_batch(texts)?;
        texts.iter().map(|t| self.embed_one(t)).collect()
    }
}

fn mean_pooling(
    hidden_states: &Tensor,
    attention_mask: &Tensor,
) -> candle_core::Result<Tensor> {
    let mask_expanded = attention_mask
        .unsqueeze(2)?
        .broadcast_as(hidden_states.shape())?
        .to_dtype(hidden_states.dtype())?;
    let sum_embeddings = (hidden_states * &mask_expanded)?.sum(1)?;
    let sum_mask = mask_expanded.sum(1)?.clamp(1e-9, f64::MAX)?;
    sum_embeddings.broadcast_div(&sum_mask)
}

fn l2_normalize(tensor: &Tensor) -> candle_core::Result<Tensor> {
    let norm = tensor.sqr()?.sum_keepdim(1)?.sqrt()?;
    tensor.broadcast_div(&norm.clamp(1e-12, f64::MAX)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get query from command line args
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: cargo run --example semantic_search -- \"your search query\"");
        std::process::exit(1);
    }
    let query = args.join(" ");

    let device = Device::cuda_if_available(0)?;

    // Load model
    println!("Loading model '{}'...", MODEL_ID);
    let start = Instant::now();
    let embedder = BertEmbedder::load(device)?;
    println!("Model loaded in {:.3}s ({} dimensions)\n", start.elapsed().as_secs_f64(), embedder.dimension());

    // Embed and store the corpus
    let start = Instant::now();
    let texts: Vec<String> = CORPUS.iter().map(|(_, text)| text.to_string()).collect();
    let vectors = embedder.embed(&texts)?;

    let store = VectorStore::new();
    for ((key, text), vector) in CORPUS.iter().zip(vectors) {
        let mut metadata = Map::new();
        metadata.insert("text".to_string(), Value::String(text.to_string()));
        store.store("docs", key.to_string(), vector, metadata);
    }
    println!("Stored {} documents in {:.3}s", store.count("docs"), start.elapsed().as_secs_f64());

    // Embed query and search
    let start = Instant::now();
    let query_vec = embedder.embed(&[query.clone()])?.remove(0);
    let embed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let start = Instant::now();
    let results = store.search("docs", &query_vec, 5, 0.3)?;
    let search_ms = start.elapsed().as_secs_f64() * 1000.0;

    // Print results
    println!("\nQuery: \"{}\"", query);
    println!("Embed: {:.1}ms | Search: {:.3}ms\n", embed_ms, search_ms);
    if results.is_empty() {
        println!("  Nothing scored over the threshold.");
    }
    for (rank, result) in results.iter().enumerate() {
        let text = result.metadata["text"].as_str().unwrap_or("");
        println!("  {:2}. {:<10} (score: {:.4})  {}", rank + 1, result.key, result.score, text);
    }

    Ok(())
}
