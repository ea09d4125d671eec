// End-to-end command flows against a fake upstream serving both stats APIs,
// with recording stand-ins for the image renderer and the text generator.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use bfstat_backend::commentary::TextGenerator;
use bfstat_backend::config::Config;
use bfstat_backend::db::Database;
use bfstat_backend::error::PluginError;
use bfstat_backend::plugin::{BattlefieldPlugin, Command, Reply};
use bfstat_backend::render::{HtmlRenderer, RenderOptions};
use bfstat_backend::request::CommandContext;

type Params = Query<HashMap<String, String>>;

// ── Fake upstream ────────────────────────────────────────────────────

fn stat(value: Value) -> Value {
    json!({ "value": value, "displayValue": value.to_string(), "percentile": 90.0 })
}

async fn legacy_profile(Query(params): Params) -> Response {
    if params.get("platform").map(String::as_str) != Some("pc")
        || params.get("lang").map(String::as_str) != Some("zh-cn")
    {
        return (StatusCode::BAD_REQUEST, Json(json!({"errors": ["bad params"]}))).into_response();
    }
    let name = params.get("name").cloned().unwrap_or_default();
    if name == "Ghost" {
        return (StatusCode::NOT_FOUND, Json(json!({"errors": ["player not found"]})))
            .into_response();
    }
    Json(json!({
        "userName": name,
        "rank": 120,
        "secondsPlayed": 36000,
        "killDeath": 1.5,
        "killsPerMinute": 0.9,
        "kills": 5000,
        "deaths": 3333,
        "weapons": [
            {"weaponName": "Gun-D", "type": "Rifles", "kills": 600},
            {"weaponName": "Gun-A", "type": "Rifles", "kills": 900},
            {"weaponName": "Unused", "type": "Rifles", "kills": 0},
            {"weaponName": "Gun-C", "type": "Rifles", "kills": 700},
            {"weaponName": "Gun-B", "type": "Rifles", "kills": 800}
        ],
        "vehicles": [
            {"vehicleName": "Tank-A", "type": "Tanks", "kills": 50, "destroyed": 3}
        ]
    }))
    .into_response()
}

async fn legacy_servers(Query(params): Params) -> Response {
    if params.get("region").map(String::as_str) != Some("all")
        || params.get("limit").map(String::as_str) != Some("30")
        || params.get("lang").map(String::as_str) != Some("zh-tw")
    {
        return (StatusCode::BAD_REQUEST, Json(json!({"errors": ["bad params"]}))).into_response();
    }
    if params.get("name").map(String::as_str) == Some("Nowhere") {
        return Json(json!({"servers": []})).into_response();
    }
    Json(json!({
        "servers": [{
            "prefix": "[ABC] MyServer",
            "description": "Welcome",
            "currentMap": "Amiens",
            "mode": "Conquest",
            "playerAmount": 60,
            "maxPlayers": 64,
            "inQue": 2,
            "region": "Asia",
            "country": "JP"
        }]
    }))
    .into_response()
}

async fn bf2042_profile(Query(params): Params) -> Response {
    match params.get("player_name").map(String::as_str) {
        Some("Twins") => Json(json!([
            {"platformUserHandle": "Twins", "platformUserIdentifier": 1001},
            {"platformUserHandle": "twins", "platformUserIdentifier": "1002"}
        ]))
        .into_response(),
        Some("Hidden") => Json(json!("This profile is private")).into_response(),
        _ => Json(json!({
            "platformInfo": {"platformUserHandle": "Shadow"},
            "segments": [{
                "type": "overview",
                "stats": {
                    "level": stat(json!(88)),
                    "timePlayed": stat(json!(72000)),
                    "kdRatio": stat(json!(2.1)),
                    "killsPerMinute": stat(json!(1.3)),
                    "kills": stat(json!(9000)),
                    "wins": stat(json!(400)),
                    "deaths": stat(json!(4300))
                }
            }]
        }))
        .into_response(),
    }
}

async fn bf2042_weapons() -> Json<Value> {
    Json(json!({
        "data": [
            {"metadata": {"name": "PP-29", "category": "SMG"}, "stats": {"kills": {"value": 100}}},
            {"metadata": {"name": "AK-24", "category": "Assault Rifles"}, "stats": {"kills": {"value": 300}}},
            {"metadata": {"name": "Never", "category": "SMG"}, "stats": {"kills": {"value": 0}}}
        ]
    }))
}

async fn bf2042_vehicles() -> Json<Value> {
    Json(json!({"data": []}))
}

async fn bf2042_soldiers() -> Json<Value> {
    Json(json!([
        {"metadata": {"name": "Mackay", "category": "Assault"}, "stats": {"kills": {"value": 50}}}
    ]))
}

async fn bf6_profile() -> Json<Value> {
    Json(json!({
        "platformInfo": {"platformUserHandle": "Shadow"},
        "metadata": {"updateHash": "h1"},
        "segments": [{
            "type": "overview",
            "stats": {
                "careerPlayerRank": stat(json!(63)),
                "timePlayed": stat(json!(7200)),
                "kdRatio": stat(json!(1.5)),
                "killsPerMinute": stat(json!(0.9)),
                "kills": stat(json!(1200)),
                "deaths": stat(json!(800))
            }
        }]
    }))
}

fn match_entry(n: u32) -> Value {
    json!({
        "metadata": {"timestamp": "2025-10-13T12:00:00Z"},
        "segments": [{
            "stats": {
                "kdRatio": {"value": 2.0},
                "killsPerMinute": {"value": 1.1},
                "kills": {"value": 20 + n},
                "deaths": {"value": 10},
                "timePlayed": {"value": 1800}
            },
            "metadata": {
                "weapons": [
                    {"metadata": {"name": format!("Weapon-{n}"), "categoryName": "Assault Rifles"}, "stats": {"kills": 12}}
                ],
                "gamemodes": [
                    {"metadata": {"name": "Conquest"}, "stats": {"matchesWon": 1, "matchesLost": 0, "matchesPlayed": 1}}
                ],
                "levels": [
                    {"metadata": {"name": "Siege of Cairo"}, "stats": {"matchesWon": 1, "matchesLost": 0, "matchesPlayed": 1}}
                ]
            }
        }]
    })
}

async fn bf6_matches(Query(params): Params) -> Response {
    if params.get("update_hash").map(String::as_str) != Some("h1") {
        return (StatusCode::BAD_REQUEST, Json(json!("missing update hash"))).into_response();
    }
    Json(json!({"matches": [match_entry(1), match_entry(2), match_entry(3)]})).into_response()
}

async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/bfv/all", get(legacy_profile))
        .route("/bfv/weapons", get(legacy_profile))
        .route("/bf1/servers", get(legacy_servers))
        .route("/player/stat", get(bf2042_profile))
        .route("/player/weapons", get(bf2042_weapons))
        .route("/player/vehicles", get(bf2042_vehicles))
        .route("/player/soldiers", get(bf2042_soldiers))
        .route("/bf6/stat", get(bf6_profile))
        .route("/bf6/matches", get(bf6_matches));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// ── Recording collaborators ──────────────────────────────────────────

#[derive(Default)]
struct RecordingRenderer {
    calls: Mutex<Vec<(String, RenderOptions)>>,
}

impl RecordingRenderer {
    fn last(&self) -> (String, RenderOptions) {
        self.calls.lock().unwrap().last().cloned().expect("no render call")
    }

    fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HtmlRenderer for RecordingRenderer {
    async fn render(&self, html: &str, options: &RenderOptions) -> Result<String, PluginError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((html.to_string(), options.clone()));
        Ok(format!("https://img.test/{}.jpg", calls.len()))
    }
}

#[derive(Default)]
struct RecordingWriter {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for RecordingWriter {
    async fn generate(&self, _system_prompt: &str, prompt: &str) -> Result<String, PluginError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("Big night&&&Shadow carried the squad".to_string())
    }
}

struct Harness {
    plugin: BattlefieldPlugin,
    renderer: Arc<RecordingRenderer>,
    writer: Arc<RecordingWriter>,
}

async fn harness() -> Harness {
    let base = spawn_upstream().await;
    let config = Config {
        gametools_api_url: base.clone(),
        tracker_api_url: base,
        ..Config::default()
    };
    let db = Database::new("sqlite::memory:").await.unwrap();
    let renderer = Arc::new(RecordingRenderer::default());
    let writer = Arc::new(RecordingWriter::default());
    let plugin = BattlefieldPlugin::new(
        Arc::new(config),
        Arc::new(db),
        renderer.clone(),
        writer.clone(),
    );
    Harness {
        plugin,
        renderer,
        writer,
    }
}

fn ctx(message: &str) -> CommandContext {
    CommandContext {
        message: message.to_string(),
        sender_id: "10001".to_string(),
        group_id: Some("g1".to_string()),
        is_admin: false,
    }
}

fn texts(replies: &[Reply]) -> Vec<String> {
    replies
        .iter()
        .map(|r| match r {
            Reply::Text { text } => text.clone(),
            Reply::Image { url } => format!("image:{url}"),
        })
        .collect()
}

// ── Legacy games ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_legacy_summary_card() {
    let h = harness().await;
    let replies = h.plugin.handle(Command::Stat, &ctx("stat Shadow")).await;
    assert_eq!(texts(&replies), vec!["image:https://img.test/1.jpg"]);

    let (html, options) = h.renderer.last();
    assert!(html.contains("Gun-A"));
    assert!(html.contains("Gun-C"));
    assert!(!html.contains("Gun-D"), "summary shows three weapons");
    assert!(!html.contains("Unused"));
    assert!(html.contains("Tank-A"));
    assert_eq!(options.clip.map(|c| c.height), Some(2353));
}

#[tokio::test]
async fn test_legacy_weapons_list_drops_zero_kills() {
    let h = harness().await;
    h.plugin
        .handle(Command::Weapons, &ctx("weapons Shadow,game=bf5"))
        .await;
    let (html, options) = h.renderer.last();
    assert!(html.contains("Gun-D"));
    assert!(!html.contains("Unused"));
    assert!(html.find("Gun-A").unwrap() < html.find("Gun-B").unwrap());
    assert_eq!(options.clip.map(|c| c.height), Some(10000));
}

#[tokio::test]
async fn test_legacy_player_not_found() {
    let h = harness().await;
    let replies = h.plugin.handle(Command::Stat, &ctx("stat Ghost,game=bfv")).await;
    assert_eq!(
        texts(&replies),
        vec!["Player 'Ghost' was not found on bfv, or the game code is wrong\n• Legacy game codes: bf4, bf1, bfv"]
    );
    assert_eq!(h.renderer.count(), 0);
}

#[tokio::test]
async fn test_bound_account_fills_name() {
    let h = harness().await;
    let replies = h.plugin.handle(Command::Bind, &ctx("bind Shadow")).await;
    assert_eq!(texts(&replies), vec!["Bound EA account Shadow"]);

    h.plugin.handle(Command::Stat, &ctx("stat")).await;
    let (html, _) = h.renderer.last();
    assert!(html.contains("Shadow"));
}

#[tokio::test]
async fn test_servers_card() {
    let h = harness().await;
    let replies = h
        .plugin
        .handle(Command::Servers, &ctx("服务器 MyServer,game=bf1"))
        .await;
    assert_eq!(replies.len(), 1);
    let (html, options) = h.renderer.last();
    assert!(html.contains("[ABC] MyServer"));
    assert!(html.contains("60/64 [2]"));
    assert!(html.contains("Asia / JP"));
    assert_eq!(options.clip.map(|c| c.height), Some(500));

    let replies = h
        .plugin
        .handle(Command::Servers, &ctx("servers Nowhere,game=bf1"))
        .await;
    assert_eq!(texts(&replies), vec!["No matching servers available"]);

    let replies = h
        .plugin
        .handle(Command::Servers, &ctx("servers MyServer,game=bf6"))
        .await;
    assert_eq!(
        texts(&replies),
        vec!["Server lookup only supports bf4, bf1, bfv, not bf6"]
    );
}

// ── bf2042 ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bf2042_weapons_list() {
    let h = harness().await;
    h.plugin
        .handle(Command::Weapons, &ctx("weapons Shadow,game=2042"))
        .await;
    let (html, options) = h.renderer.last();
    assert!(html.find("AK-24").unwrap() < html.find("PP-29").unwrap());
    assert!(html.contains("突击步枪"));
    assert!(!html.contains("Never"));
    assert_eq!(options.clip.map(|c| c.height), Some(20000));
}

#[tokio::test]
async fn test_multiple_accounts_hint() {
    let h = harness().await;
    let replies = h
        .plugin
        .handle(Command::Stat, &ctx("stat Twins,game=bf2042"))
        .await;
    let text = &texts(&replies)[0];
    assert!(text.starts_with("Multiple accounts found:"));
    assert!(text.contains("/stat pider=1001"));
    assert!(text.contains("/bind Twins,pider=1002"));
    assert_eq!(h.renderer.count(), 0);
}

#[tokio::test]
async fn test_private_profile() {
    let h = harness().await;
    let replies = h
        .plugin
        .handle(Command::Stat, &ctx("stat Hidden,game=bf2042"))
        .await;
    assert_eq!(
        texts(&replies),
        vec!["Player data is private, enable Settings -> System -> Game data sharing"]
    );
}

#[tokio::test]
async fn test_soldiers_rejected_for_legacy_game() {
    let h = harness().await;
    let replies = h
        .plugin
        .handle(Command::Soldiers, &ctx("soldiers Shadow,game=bf1"))
        .await;
    assert_eq!(
        texts(&replies),
        vec!["Soldier lookup only supports bf2042, bf6, not bf1"]
    );
}

// ── bf6 recent matches ───────────────────────────────────────────────

#[tokio::test]
async fn test_recent_first_page_offers_next() {
    let h = harness().await;
    let replies = h
        .plugin
        .handle(Command::Recent, &ctx("recent Shadow,game=bf6"))
        .await;
    assert_eq!(
        texts(&replies),
        vec![
            "image:https://img.test/1.jpg",
            "Next page",
            "/recent Shadow,game=bf6,page=2"
        ]
    );

    let (html, options) = h.renderer.last();
    assert!(html.contains("Weapon-1"));
    assert!(html.contains("Big night"));
    assert!(html.contains("Shadow carried the squad"));
    assert_eq!(options.clip, None);

    let prompts = h.writer.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("征服"));
}

#[tokio::test]
async fn test_recent_last_page_and_beyond() {
    let h = harness().await;
    let replies = h
        .plugin
        .handle(Command::Recent, &ctx("战报 Shadow,game=bf6,page=3"))
        .await;
    assert_eq!(replies.len(), 1);
    let (html, _) = h.renderer.last();
    assert!(html.contains("Weapon-3"));

    let replies = h
        .plugin
        .handle(Command::Recent, &ctx("recent Shadow,game=bf6,page=5"))
        .await;
    assert_eq!(texts(&replies), vec!["No data available"]);
}

#[tokio::test]
async fn test_recent_only_for_bf6() {
    let h = harness().await;
    let replies = h
        .plugin
        .handle(Command::Recent, &ctx("recent Shadow,game=bf2042"))
        .await;
    assert_eq!(
        texts(&replies),
        vec!["Recent match lookup only supports bf6, not bf2042"]
    );
}

// ── Tool mode ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tool_stat_text() {
    let h = harness().await;
    let sender = ctx("");
    let answer = h.plugin.tool_bind(&sender, "Shadow", None).await;
    assert_eq!(answer, "Bound EA account Shadow");

    let answer = h.plugin.tool_stat(&sender, None, Some("bf2042"), None).await;
    assert!(answer.starts_with(&h.plugin.config().stat_prompt));
    assert!(answer.contains("player Shadow has 9000 career kills"));
    assert!(answer.contains("AK-24"));
    assert_eq!(h.renderer.count(), 0);
}
