use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use bfstat_backend::commentary::{OpenAiClient, TextGenerator, UnconfiguredGenerator};
use bfstat_backend::config::Config;
use bfstat_backend::db::Database;
use bfstat_backend::plugin::BattlefieldPlugin;
use bfstat_backend::render::{HtmlRenderer, HttpRenderer, UnconfiguredRenderer};
use bfstat_backend::{api, metrics};

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "bfstat-backend" }))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(Config::load());
    metrics::register_metrics();

    let db = Database::new(&config.database_url)
        .await
        .expect("Failed to initialize database");
    let db = Arc::new(db);

    let renderer: Arc<dyn HtmlRenderer> = match &config.render_service_url {
        Some(url) => Arc::new(HttpRenderer::new(url)),
        None => {
            tracing::warn!("RENDER_SERVICE_URL is not set; image commands will fail");
            Arc::new(UnconfiguredRenderer)
        }
    };
    let writer: Arc<dyn TextGenerator> = match &config.llm_base_url {
        Some(url) => Arc::new(OpenAiClient::new(url, &config.llm_model)),
        None => {
            tracing::info!("LLM_BASE_URL is not set; match commentary is disabled");
            Arc::new(UnconfiguredGenerator)
        }
    };

    let plugin = Arc::new(BattlefieldPlugin::new(config.clone(), db, renderer, writer));

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(api::router(plugin))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {addr}: {e}"));

    tracing::info!("bfstat backend listening on {addr}");
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
