use anyhow::Context;
use clap::Parser;
use sheetqa_api::RestApi;
use sheetqa_core::{AnswerExtractor, HashEmbedder, TextEmbedder};
use sheetqa_engine::QaEngine;
use sheetqa_models::{EmbedderConfig, ModelPaths, OnnxEmbedder, OnnxExtractor, QaConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Ask questions against an uploaded spreadsheet
#[derive(Parser, Debug)]
#[command(name = "sheetqa")]
#[command(about = "Spreadsheet question answering over semantic row retrieval", long_about = None)]
struct Args {
    /// Directory holding embedder.onnx, qa.onnx and their tokenizer files
    #[arg(short, long, default_value = "./models")]
    models_dir: PathBuf,

    /// Directory with the static frontend; pass an empty string to disable
    #[arg(long, default_value = "./static")]
    static_dir: String,

    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// HTTP API port
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Use the hashing bag-of-words embedder instead of an ONNX embedding
    /// model (no embedder.onnx needed; retrieval quality drops to token
    /// overlap)
    #[arg(long, default_value_t = false)]
    hash_embedder: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting SheetQA v{}", env!("CARGO_PKG_VERSION"));
    info!("Models directory: {:?}", args.models_dir);

    let paths = ModelPaths::from_dir(&args.models_dir);

    // Both models load exactly once, before the server binds; a broken or
    // missing model file is fatal to startup.
    let embedder: Arc<dyn TextEmbedder> = if args.hash_embedder {
        info!("Using hashing embedder (no embedding model file)");
        Arc::new(HashEmbedder::default())
    } else {
        let embedder = OnnxEmbedder::from_files(
            &paths.embedder_model,
            &paths.embedder_tokenizer,
            EmbedderConfig::default(),
        )
        .context("failed to load the sentence embedding model")?;
        info!(dim = embedder.dim(), "Embedding model loaded");
        Arc::new(embedder)
    };

    let extractor: Arc<dyn AnswerExtractor> = Arc::new(
        OnnxExtractor::from_files(&paths.qa_model, &paths.qa_tokenizer, QaConfig::default())
            .context("failed to load the question answering model")?,
    );
    info!("QA model loaded");

    let engine = Arc::new(QaEngine::new(embedder, extractor));

    let static_dir = if args.static_dir.is_empty() {
        None
    } else {
        Some(PathBuf::from(&args.static_dir))
    };

    info!("HTTP API: http://{}:{}/", args.host, args.port);
    RestApi::start(engine, &args.host, args.port, static_dir)
        .await
        .context("HTTP server failed")?;

    info!("Shutting down...");
    Ok(())
}
