//! HTTP server implementation

use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::rag::QuestionService;
use crate::Result;

/// Start the API server and run until Ctrl-C
pub async fn serve_api(config: &AppConfig, service: QuestionService) -> Result<()> {
    info!("🚀 Starting askrag API server...");

    let state = AppState::new(service, &config.session)?;

    let mut app = routes::api_routes(state).layer(TraceLayer::new_for_http());

    // Add CORS if enabled
    if config.server.cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("  POST /askquestion  - Answer a question from retrieved context");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
