use std::error::Error;
use std::sync::Arc;

use colloquy::api::router::{api_router, cors_layer};
use colloquy::api::server::start_server;
use colloquy::api::ApiContext;
use colloquy::config::{self, Settings};
use colloquy::db;
use colloquy::llm::{ChatClient, ChatCompletion};
use colloquy::rag::{self, Embedder, HttpEmbedder, RagError, Retriever};

#[tokio::main]
async fn main() {
    colloquy::init_tracing();

    if let Err(e) = run().await {
        tracing::error!("startup failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    tracing::info!("{} v{} starting", config::APP_NAME, config::APP_VERSION);
    let settings = Settings::load_default()?;

    let db_path = &settings.storage.database_path;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = db::open_database(db_path)?;
    tracing::info!(path = %db_path.display(), "database ready");

    let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::new(
        &settings.llm.api_url,
        &settings.llm.api_key,
        &settings.llm.embedding_model,
    )?);

    // Index the configured document if nobody has yet. Failure leaves
    // the service running without grounding.
    if let Some(document) = &settings.storage.document_path {
        if let Err(e) = rag::indexer::build_index(&conn, embedder.as_ref(), document).await {
            tracing::warn!("vector index build failed: {e}");
        }
    }

    let retriever = match Retriever::load(&conn, embedder) {
        Ok(retriever) => {
            tracing::info!(chunks = retriever.len(), "vector index loaded");
            Some(Arc::new(retriever))
        }
        Err(RagError::NotInitialized) => {
            tracing::warn!("vector index not built; replies will not be grounded");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let llm: Arc<dyn ChatCompletion> =
        Arc::new(ChatClient::new(&settings.llm.api_url, &settings.llm.api_key)?);

    let ctx = ApiContext::new(conn, llm, retriever);
    let cors = cors_layer(&settings.server.cors_allow_origin_regex)?;
    let app = api_router(ctx).layer(cors);

    let mut server = start_server(app, &settings.server.bind_addr).await?;
    tracing::info!(addr = %server.addr, "listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    server.shutdown();
    server.stopped().await;
    Ok(())
}
