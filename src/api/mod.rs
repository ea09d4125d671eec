// HTTP API routes (chat commands, LLM tools, docs and metrics)

use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::metrics;
use crate::plugin::{BattlefieldPlugin, Command};
use crate::request::CommandContext;
use crate::tools::{self, BindArgs, StatArgs, ToolCall};

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub plugin: Arc<BattlefieldPlugin>,
}

// ── Error helper ──────────────────────────────────────────────────────

fn json_error(status: StatusCode, msg: &str) -> impl IntoResponse {
    (status, Json(json!({ "error": msg })))
}

fn bad_request(e: JsonRejection) -> axum::response::Response {
    tracing::debug!("Rejected request body: {e}");
    json_error(StatusCode::BAD_REQUEST, &e.body_text()).into_response()
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(plugin: Arc<BattlefieldPlugin>) -> Router {
    let state = AppState { plugin };

    Router::new()
        // Chat commands
        .route("/api/commands/{command}", post(run_command))
        // LLM tools
        .route("/api/tools", get(list_tools))
        .route("/api/tools/bf_tool_bind", post(tool_bind))
        .route("/api/tools/bf_tool_stat", post(tool_stat))
        // Help
        .route("/api/help", get(get_help))
        // Documentation
        .route("/llms.txt", get(get_llms_txt))
        // Metrics
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

// ── Command handlers ──────────────────────────────────────────────────

async fn run_command(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<CommandContext>, JsonRejection>,
) -> impl IntoResponse {
    let Some(command) = Command::from_name(&name) else {
        return json_error(StatusCode::NOT_FOUND, "Unknown command").into_response();
    };
    let ctx = match body {
        Ok(Json(ctx)) => ctx,
        Err(e) => return bad_request(e),
    };
    let replies = state.plugin.handle(command, &ctx).await;
    (StatusCode::OK, Json(json!({ "replies": replies }))).into_response()
}

async fn get_help(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        state.plugin.help(),
    )
        .into_response()
}

// ── Tool handlers ─────────────────────────────────────────────────────

async fn list_tools() -> impl IntoResponse {
    (StatusCode::OK, Json(json!(tools::definitions())))
}

async fn tool_bind(
    State(state): State<AppState>,
    body: Result<Json<ToolCall<BindArgs>>, JsonRejection>,
) -> impl IntoResponse {
    let call = match body {
        Ok(Json(call)) => call,
        Err(e) => return bad_request(e),
    };
    let text = state
        .plugin
        .tool_bind(
            &call.context,
            &call.arguments.ea_name,
            call.arguments.user_id.as_deref(),
        )
        .await;
    (StatusCode::OK, Json(json!({ "text": text }))).into_response()
}

async fn tool_stat(
    State(state): State<AppState>,
    body: Result<Json<ToolCall<StatArgs>>, JsonRejection>,
) -> impl IntoResponse {
    let call = match body {
        Ok(Json(call)) => call,
        Err(e) => return bad_request(e),
    };
    let args = &call.arguments;
    let text = state
        .plugin
        .tool_stat(
            &call.context,
            args.user_id.as_deref(),
            args.game.as_deref(),
            args.ea_name.as_deref(),
        )
        .await;
    (StatusCode::OK, Json(json!({ "text": text }))).into_response()
}

// ── Documentation & metrics ───────────────────────────────────────────

async fn get_llms_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        crate::llms_txt::render(&state.plugin.config().wake_prefix),
    )
        .into_response()
}

async fn get_metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::UnconfiguredGenerator;
    use crate::config::Config;
    use crate::db::Database;
    use crate::render::UnconfiguredRenderer;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn app() -> Router {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let plugin = BattlefieldPlugin::new(
            Arc::new(Config::default()),
            Arc::new(db),
            Arc::new(UnconfiguredRenderer),
            Arc::new(UnconfiguredGenerator),
        );
        router(Arc::new(plugin))
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unknown_command_is_404() {
        let app = app().await;
        let (status, body) =
            post_json(&app, "/api/commands/kick", json!({"message": "", "sender_id": "1"})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unknown command");
    }

    #[tokio::test]
    async fn test_bind_command_over_http() {
        let app = app().await;
        let (status, body) = post_json(
            &app,
            "/api/commands/%E7%BB%91%E5%AE%9A",
            json!({"message": "绑定 Shadow", "sender_id": "10001"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["replies"],
            json!([{"type": "text", "text": "Bound EA account Shadow"}])
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let app = app().await;
        let (status, body) = post_json(&app, "/api/commands/stat", json!({"message": 1})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_tools_over_http() {
        let app = app().await;
        let response = app
            .clone()
            .oneshot(Request::get("/api/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let tools: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(tools[0]["name"], "bf_tool_bind");

        let (_, body) = post_json(
            &app,
            "/api/tools/bf_tool_bind",
            json!({"context": {"message": "", "sender_id": "10001"}, "arguments": {"ea_name": "Shadow", "user_id": "20002"}}),
        )
        .await;
        assert_eq!(body["text"], "Bound EA account Shadow");

        let (_, body) = post_json(
            &app,
            "/api/tools/bf_tool_stat",
            json!({"context": {"message": "", "sender_id": "10001"}, "arguments": {}}),
        )
        .await;
        assert_eq!(
            body["text"],
            "User 10001 has no bound EA account, please bind one first with bind [ea_name]"
        );
    }

    #[tokio::test]
    async fn test_llms_txt_and_metrics() {
        let app = app().await;
        let response = app
            .clone()
            .oneshot(Request::get("/llms.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("POST /api/commands/{command}"));

        let response = app
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
