mod cli;

use actix_web::{web, App, HttpServer};
use embeddb::VectorStore;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        let store = VectorStore::new();
        cli::run_repl(&store);
    } else if args[1] == "serve" {
        let port = std::env::var("EMBEDDB_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(7878);

        let store = web::Data::new(VectorStore::new());
        tracing::info!(port, "serving embeddb");

        HttpServer::new(move || {
            App::new()
                .app_data(store.clone())
                .configure(embeddb::server::config)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await?;
    } else {
        eprintln!("Usage: embeddb [serve]");
        eprintln!("  (no args)  start the interactive REPL");
        eprintln!("  serve      start the HTTP server on EMBEDDB_PORT (default 7878)");
        std::process::exit(1);
    }

    Ok(())
}
