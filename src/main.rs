//! Lector Server binary
//!
//! Bootstraps configuration, storage, and the OCR/TTS collaborators, then
//! serves the processing API with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lector_server::config::Config;
use lector_server::ocr::{OcrProvider, VisionOcr};
use lector_server::storage::S3Client;
use lector_server::tts::LongAudioClient;
use lector_server::{build_router, AppState};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lector_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting Lector Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("S3 endpoint: {}", config.storage.endpoint);
    tracing::info!("S3 bucket: {}", config.storage.bucket);
    tracing::info!("TTS voice: {}", config.tts.voice);

    // Initialize S3 client
    let s3_client = S3Client::new(&config.storage)
        .await
        .expect("Failed to initialize S3 client");

    // Initialize collaborators
    let ocr = Arc::new(VisionOcr::new(&config.ocr));
    if !ocr.is_available() {
        tracing::warn!("No OCR access token configured; scanned PDFs will fail");
    }
    let synthesizer = Arc::new(LongAudioClient::new(&config.tts));

    // Create application state
    let app_state = AppState::new(config.clone(), s3_client, ocr, synthesizer);

    if !app_state.transcoder().check_available().await {
        tracing::warn!(
            "ffmpeg not found at {}; transcoding will fail",
            app_state.transcoder().ffmpeg_path()
        );
    }

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Lector Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    tracing::info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
