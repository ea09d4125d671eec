// Chat commands and LLM tools, wired to back-ends, renderer and storage.

use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::backend::{next_page_command, GameBackend, LegacyBackend, Query, TrackerBackend};
use crate::boundary::{run_command, run_tool};
use crate::commentary::{commentate, TextGenerator};
use crate::config::Config;
use crate::db::{Database, Upsert};
use crate::error::PluginError;
use crate::game::{ApiFamily, Game};
use crate::localize::Assets;
use crate::parser::strip_triggers;
use crate::render::narrative::player_narrative;
use crate::render::templates;
use crate::render::{
    server_clip_height, HtmlRenderer, RenderOptions, CLIP_LEGACY_LIST, CLIP_SOLDIERS,
    CLIP_SUMMARY, CLIP_TRACKER_LIST,
};
use crate::request::{resolve_request, resolve_tool_request, CommandContext, Subject};
use crate::upstream::gametools::GametoolsClient;
use crate::upstream::tracker::TrackerClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Stat,
    Weapons,
    Vehicles,
    Soldiers,
    Recent,
    Servers,
    Bind,
    BfInit,
    BfHelp,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::Stat,
        Command::Weapons,
        Command::Vehicles,
        Command::Soldiers,
        Command::Recent,
        Command::Servers,
        Command::Bind,
        Command::BfInit,
        Command::BfHelp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Stat => "stat",
            Command::Weapons => "weapons",
            Command::Vehicles => "vehicles",
            Command::Soldiers => "soldiers",
            Command::Recent => "recent",
            Command::Servers => "servers",
            Command::Bind => "bind",
            Command::BfInit => "bf_init",
            Command::BfHelp => "bf_help",
        }
    }

    /// Words stripped from the message before its argument is parsed.
    pub fn triggers(self) -> &'static [&'static str] {
        match self {
            Command::Stat => &["stat"],
            Command::Weapons => &["weapons", "武器"],
            Command::Vehicles => &["vehicles", "载具"],
            Command::Soldiers => &["soldiers", "士兵"],
            Command::Recent => &["recent", "最近", "战报"],
            Command::Servers => &["servers", "服务器"],
            Command::Bind => &["bind", "绑定"],
            Command::BfInit => &["bf_init"],
            Command::BfHelp => &["bf_help"],
        }
    }

    /// Look up a command by its name or one of its aliases.
    pub fn from_name(name: &str) -> Option<Command> {
        Command::ALL
            .into_iter()
            .find(|c| c.name() == name || c.triggers().contains(&name))
    }
}

/// One message sent back to the chat surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    Text { text: String },
    Image { url: String },
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Reply::Text { text: text.into() }
    }
}

pub struct BattlefieldPlugin {
    config: Arc<Config>,
    db: Arc<Database>,
    legacy: Arc<dyn GameBackend>,
    tracker: Arc<dyn GameBackend>,
    renderer: Arc<dyn HtmlRenderer>,
    writer: Arc<dyn TextGenerator>,
    assets: Assets,
}

impl BattlefieldPlugin {
    /// Build the plugin with HTTP back-ends taken from `config`.
    pub fn new(
        config: Arc<Config>,
        db: Arc<Database>,
        renderer: Arc<dyn HtmlRenderer>,
        writer: Arc<dyn TextGenerator>,
    ) -> Self {
        let legacy = LegacyBackend::new(
            GametoolsClient::new(&config.gametools_api_url, config.timeout),
            &config.default_platform,
        );
        let tracker = TrackerBackend::new(
            TrackerClient::new(&config.tracker_api_url, config.api_key.clone(), config.timeout),
            &config.wake_prefix,
        );
        Self::with_backends(
            config,
            db,
            Arc::new(legacy),
            Arc::new(tracker),
            renderer,
            writer,
        )
    }

    pub fn with_backends(
        config: Arc<Config>,
        db: Arc<Database>,
        legacy: Arc<dyn GameBackend>,
        tracker: Arc<dyn GameBackend>,
        renderer: Arc<dyn HtmlRenderer>,
        writer: Arc<dyn TextGenerator>,
    ) -> Self {
        let assets = Assets::new(&config.asset_base_url);
        Self {
            config,
            db,
            legacy,
            tracker,
            renderer,
            writer,
            assets,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn backend(&self, game: Game) -> &dyn GameBackend {
        match game.family() {
            ApiFamily::Legacy => self.legacy.as_ref(),
            ApiFamily::Tracker => self.tracker.as_ref(),
        }
    }

    async fn render(&self, html: String, clip_height: Option<u32>) -> Result<Reply, PluginError> {
        let options = RenderOptions::new(self.config.img_quality, clip_height);
        let url = self.renderer.render(&html, &options).await?;
        Ok(Reply::Image { url })
    }

    // ── Chat commands ─────────────────────────────────────────────────

    /// Handle one chat command. Always answers; failures become one text reply.
    pub async fn handle(&self, command: Command, ctx: &CommandContext) -> Vec<Reply> {
        let span = tracing::info_span!(
            "command",
            command = command.name(),
            request_id = %Uuid::new_v4(),
            sender = %ctx.sender_id,
        );
        run_command(command.name(), self.dispatch(command, ctx))
            .instrument(span)
            .await
    }

    async fn dispatch(
        &self,
        command: Command,
        ctx: &CommandContext,
    ) -> Result<Vec<Reply>, PluginError> {
        match command {
            Command::Stat => self.player_card(command, ctx, Query::Summary).await,
            Command::Weapons => self.player_card(command, ctx, Query::Weapons).await,
            Command::Vehicles => self.player_card(command, ctx, Query::Vehicles).await,
            Command::Soldiers => self.player_card(command, ctx, Query::Soldiers).await,
            Command::Recent => self.recent(ctx).await,
            Command::Servers => self.servers(ctx).await,
            Command::Bind => self.bind(ctx).await,
            Command::BfInit => self.init_channel(ctx).await,
            Command::BfHelp => Ok(vec![Reply::text(self.help())]),
        }
    }

    async fn player_card(
        &self,
        command: Command,
        ctx: &CommandContext,
        query: Query,
    ) -> Result<Vec<Reply>, PluginError> {
        let request =
            resolve_request(&self.db, &self.config, ctx, command.triggers(), Subject::Player)
                .await?;
        tracing::info!(game = %request.game, player = request.display_name(), "Player lookup");

        let report = self.backend(request.game).player_report(&request, query).await?;
        let list_clip = match request.game.family() {
            ApiFamily::Legacy => CLIP_LEGACY_LIST,
            ApiFamily::Tracker => CLIP_TRACKER_LIST,
        };
        let (html, clip) = match query {
            Query::Summary => (templates::summary_card(&report, &self.assets), CLIP_SUMMARY),
            Query::Weapons => (templates::weapons_card(&report, &self.assets), list_clip),
            Query::Vehicles => (templates::vehicles_card(&report, &self.assets), list_clip),
            Query::Soldiers => (templates::soldiers_card(&report, &self.assets), CLIP_SOLDIERS),
        };
        Ok(vec![self.render(html, Some(clip)).await?])
    }

    async fn recent(&self, ctx: &CommandContext) -> Result<Vec<Reply>, PluginError> {
        let request = resolve_request(
            &self.db,
            &self.config,
            ctx,
            Command::Recent.triggers(),
            Subject::Player,
        )
        .await?;
        tracing::info!(game = %request.game, player = request.display_name(), page = request.page, "Recent match lookup");

        let page = self.backend(request.game).recent_match(&request).await?;
        let commentary = commentate(self.writer.as_ref(), &page.report).await;
        let html = templates::matches_card(&page.report, &commentary, &self.assets);

        let mut replies = vec![self.render(html, None).await?];
        if let Some(next) = page.next_page {
            let name = request
                .ea_name
                .clone()
                .unwrap_or_else(|| page.report.stats.user_name.clone());
            replies.push(Reply::text("Next page"));
            replies.push(Reply::text(next_page_command(
                &self.config.wake_prefix,
                &name,
                request.pider.as_deref(),
                next,
            )));
        }
        Ok(replies)
    }

    async fn servers(&self, ctx: &CommandContext) -> Result<Vec<Reply>, PluginError> {
        let request = resolve_request(
            &self.db,
            &self.config,
            ctx,
            Command::Servers.triggers(),
            Subject::Server,
        )
        .await?;
        tracing::info!(game = %request.game, server = ?request.server_name, "Server lookup");

        let servers = self.backend(request.game).servers(&request).await?;
        let html = templates::servers_card(request.game, &servers, &self.assets);
        Ok(vec![self.render(html, Some(server_clip_height(servers.len()))).await?])
    }

    async fn bind(&self, ctx: &CommandContext) -> Result<Vec<Reply>, PluginError> {
        let request = resolve_request(
            &self.db,
            &self.config,
            ctx,
            Command::Bind.triggers(),
            Subject::Binding,
        )
        .await?;
        let ea_name = request.ea_name.clone().unwrap_or_default();
        let ea_id = request.pider.clone().unwrap_or_default();
        let outcome = self
            .db
            .upsert_user_binding(&ctx.sender_id, &ea_name, &ea_id)
            .await?;
        tracing::info!(user = %ctx.sender_id, ea_name = %ea_name, ea_id = %ea_id, ?outcome, "Account bound");
        Ok(vec![Reply::text(bind_message(
            outcome,
            request.display_name(),
        ))])
    }

    async fn init_channel(&self, ctx: &CommandContext) -> Result<Vec<Reply>, PluginError> {
        if ctx.is_group() && !ctx.is_admin {
            return Err(PluginError::PermissionDenied {
                operation: Command::BfInit.name().to_string(),
            });
        }
        let code = strip_triggers(Command::BfInit.triggers(), &ctx.message);
        if code.is_empty() {
            return Err(PluginError::UserInput(
                "The default game cannot be empty".to_string(),
            ));
        }
        let game = Game::parse(&code).ok_or(PluginError::GameNotSupported { game: code })?;

        let outcome = self
            .db
            .upsert_channel_default(ctx.channel_id(), game.code())
            .await?;
        tracing::info!(channel = ctx.channel_id(), game = %game, ?outcome, "Channel default set");
        let text = match outcome {
            Upsert::Created => format!("Default game for this channel set to {game}"),
            Upsert::Updated => format!("Default game for this channel changed to {game}"),
        };
        Ok(vec![Reply::text(text)])
    }

    pub fn help(&self) -> String {
        let p = &self.config.wake_prefix;
        format!(
            "Battlefield stats help:\n\
             1. Bind an account\n\
             Command: {p}bind [ea_name] or {p}绑定 [ea_name]\n\
             Example: {p}bind ExamplePlayer\n\n\
             2. Default game for this channel\n\
             Command: {p}bf_init [game]\n\
             Games: {codes}\n\
             Note: anyone can use it in private chats, only bot admins in groups\n\n\
             3. Player stats\n\
             Command: {p}stat [ea_name],game=[game]\n\
             ea_name may be omitted once bound, game is optional\n\
             Example: {p}stat ExamplePlayer,game=bf1\n\n\
             4. Weapons\n\
             Command: {p}weapons [ea_name],game=[game] or {p}武器 [ea_name],game=[game]\n\
             Example: {p}weapons ExamplePlayer,game=bfv\n\n\
             5. Vehicles\n\
             Command: {p}vehicles [ea_name],game=[game] or {p}载具 [ea_name],game=[game]\n\
             Example: {p}vehicles ExamplePlayer\n\n\
             6. Soldiers (bf2042, bf6)\n\
             Command: {p}soldiers [ea_name],game=bf2042 or {p}士兵 [ea_name],game=bf2042\n\
             Example: {p}soldiers ExamplePlayer,game=bf2042\n\n\
             7. Recent matches (bf6)\n\
             Command: {p}recent [ea_name],game=bf6,page=[n] or {p}战报 [ea_name]\n\
             Example: {p}recent ExamplePlayer,game=bf6,page=2\n\n\
             8. Servers\n\
             Command: {p}servers [server_name],game=[game] or {p}服务器 [server_name],game=[game]\n\
             Example: {p}servers MyServer,game=bf1\n\n\
             Leave out the [] when typing a command.",
            codes = Game::supported_codes()
        )
    }

    // ── LLM tools ─────────────────────────────────────────────────────

    /// Bind `ea_name` for `user_id`, or for the sender when no id is given.
    pub async fn tool_bind(
        &self,
        ctx: &CommandContext,
        ea_name: &str,
        user_id: Option<&str>,
    ) -> String {
        let span = tracing::info_span!("tool", tool = "bf_tool_bind", request_id = %Uuid::new_v4());
        run_tool("bf_tool_bind", self.bind_for(ctx, ea_name, user_id))
            .instrument(span)
            .await
    }

    async fn bind_for(
        &self,
        ctx: &CommandContext,
        ea_name: &str,
        user_id: Option<&str>,
    ) -> Result<String, PluginError> {
        let ea_name = ea_name.trim();
        if ea_name.is_empty() {
            return Err(PluginError::InvalidParameter {
                parameter: "ea_name".to_string(),
                value: None,
                expected: None,
            });
        }
        let user = user_id
            .filter(|id| !id.is_empty())
            .unwrap_or(&ctx.sender_id);
        let outcome = self.db.upsert_user_binding(user, ea_name, "").await?;
        tracing::info!(user, ea_name, ?outcome, "Account bound by tool");
        Ok(bind_message(outcome, ea_name))
    }

    /// Describe a player's career in prose for the agent to judge.
    pub async fn tool_stat(
        &self,
        ctx: &CommandContext,
        user_id: Option<&str>,
        game: Option<&str>,
        ea_name: Option<&str>,
    ) -> String {
        let span = tracing::info_span!("tool", tool = "bf_tool_stat", request_id = %Uuid::new_v4());
        run_tool("bf_tool_stat", self.describe_player(ctx, user_id, game, ea_name))
            .instrument(span)
            .await
    }

    async fn describe_player(
        &self,
        ctx: &CommandContext,
        user_id: Option<&str>,
        game: Option<&str>,
        ea_name: Option<&str>,
    ) -> Result<String, PluginError> {
        let request =
            resolve_tool_request(&self.db, &self.config, ctx, ea_name, user_id, game).await?;
        tracing::info!(game = %request.game, player = request.display_name(), "Tool stat lookup");
        let report = self
            .backend(request.game)
            .player_report(&request, Query::Summary)
            .await?;
        Ok(player_narrative(&self.config.stat_prompt, &report))
    }
}

fn bind_message(outcome: Upsert, name: &str) -> String {
    match outcome {
        Upsert::Created => format!("Bound EA account {name}"),
        Upsert::Updated => format!("Bound EA account updated to {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockGameBackend, PlayerReport};
    use crate::commentary::MockTextGenerator;
    use crate::models::PlayerStats;
    use crate::render::MockHtmlRenderer;

    fn ctx(message: &str, group: Option<&str>, is_admin: bool) -> CommandContext {
        CommandContext {
            message: message.to_string(),
            sender_id: "10001".to_string(),
            group_id: group.map(str::to_string),
            is_admin,
        }
    }

    fn report(game: Game) -> PlayerReport {
        PlayerReport {
            game,
            stats: PlayerStats {
                user_name: "Shadow".to_string(),
                ..PlayerStats::default()
            },
            weapons: Vec::new(),
            vehicles: Vec::new(),
            soldiers: Vec::new(),
        }
    }

    async fn plugin(
        legacy: MockGameBackend,
        tracker: MockGameBackend,
        renderer: MockHtmlRenderer,
    ) -> BattlefieldPlugin {
        let db = Database::new("sqlite::memory:").await.unwrap();
        BattlefieldPlugin::with_backends(
            Arc::new(Config::default()),
            Arc::new(db),
            Arc::new(legacy),
            Arc::new(tracker),
            Arc::new(renderer),
            Arc::new(MockTextGenerator::new()),
        )
    }

    fn text(replies: &[Reply]) -> &str {
        match replies {
            [Reply::Text { text }] => text,
            other => panic!("expected one text reply, got {other:?}"),
        }
    }

    #[test]
    fn test_command_lookup() {
        assert_eq!(Command::from_name("stat"), Some(Command::Stat));
        assert_eq!(Command::from_name("战报"), Some(Command::Recent));
        assert_eq!(Command::from_name("bf_init"), Some(Command::BfInit));
        assert_eq!(Command::from_name("kick"), None);
    }

    #[test]
    fn test_reply_serialization() {
        let value = serde_json::to_value(Reply::Image { url: "u".into() }).unwrap();
        assert_eq!(value, serde_json::json!({"type": "image", "url": "u"}));
    }

    #[tokio::test]
    async fn test_stat_routes_by_family_and_clips() {
        let mut legacy = MockGameBackend::new();
        legacy
            .expect_player_report()
            .withf(|r, q| r.game == Game::Bf1 && *q == Query::Summary)
            .times(1)
            .returning(|r, _| Ok(report(r.game)));
        let mut tracker = MockGameBackend::new();
        tracker.expect_player_report().never();
        let mut renderer = MockHtmlRenderer::new();
        renderer
            .expect_render()
            .withf(|html, options| {
                html.contains("Shadow")
                    && options.quality == 90
                    && options.clip.map(|c| c.height) == Some(CLIP_SUMMARY)
            })
            .times(1)
            .returning(|_, _| Ok("https://img/stat.jpg".to_string()));

        let plugin = plugin(legacy, tracker, renderer).await;
        let replies = plugin
            .handle(Command::Stat, &ctx("stat Shadow,game=bf1", None, false))
            .await;
        assert_eq!(
            replies,
            vec![Reply::Image {
                url: "https://img/stat.jpg".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_tracker_list_clip() {
        let legacy = MockGameBackend::new();
        let mut tracker = MockGameBackend::new();
        tracker
            .expect_player_report()
            .returning(|r, _| Ok(report(r.game)));
        let mut renderer = MockHtmlRenderer::new();
        renderer
            .expect_render()
            .withf(|_, options| options.clip.map(|c| c.height) == Some(CLIP_TRACKER_LIST))
            .times(1)
            .returning(|_, _| Ok("u".to_string()));

        let plugin = plugin(legacy, tracker, renderer).await;
        plugin
            .handle(Command::Weapons, &ctx("武器 Shadow,game=2042", None, false))
            .await;
    }

    #[tokio::test]
    async fn test_unbound_stat_is_one_text_line() {
        let plugin = plugin(
            MockGameBackend::new(),
            MockGameBackend::new(),
            MockHtmlRenderer::new(),
        )
        .await;
        let replies = plugin.handle(Command::Stat, &ctx("stat", None, false)).await;
        assert_eq!(text(&replies), "Please bind an account first with bind [ea_name]");
    }

    #[tokio::test]
    async fn test_bind_then_rebind() {
        let plugin = plugin(
            MockGameBackend::new(),
            MockGameBackend::new(),
            MockHtmlRenderer::new(),
        )
        .await;
        let replies = plugin.handle(Command::Bind, &ctx("bind Shadow", None, false)).await;
        assert_eq!(text(&replies), "Bound EA account Shadow");
        let replies = plugin
            .handle(Command::Bind, &ctx("绑定 Shadow,pider=1001", None, false))
            .await;
        assert_eq!(text(&replies), "Bound EA account updated to Shadow");

        let binding = plugin.db.get_user_binding("10001").await.unwrap().unwrap();
        assert_eq!(binding.ea_id, "1001");
    }

    #[tokio::test]
    async fn test_bf_init_rules() {
        let plugin = plugin(
            MockGameBackend::new(),
            MockGameBackend::new(),
            MockHtmlRenderer::new(),
        )
        .await;

        let replies = plugin
            .handle(Command::BfInit, &ctx("bf_init bf6", Some("g1"), false))
            .await;
        assert_eq!(
            text(&replies),
            "Permission denied: only bot administrators can use bf_init"
        );

        let replies = plugin
            .handle(Command::BfInit, &ctx("bf_init ", Some("g1"), true))
            .await;
        assert_eq!(text(&replies), "The default game cannot be empty");

        let replies = plugin
            .handle(Command::BfInit, &ctx("bf_init bf3", Some("g1"), true))
            .await;
        assert!(text(&replies).starts_with("Game 'bf3' not found"));

        let replies = plugin
            .handle(Command::BfInit, &ctx("bf_init bf5", Some("g1"), true))
            .await;
        assert_eq!(text(&replies), "Default game for this channel set to bfv");

        // Private chats need no admin rights.
        let replies = plugin
            .handle(Command::BfInit, &ctx("bf_init 2042", None, false))
            .await;
        assert_eq!(text(&replies), "Default game for this channel set to bf2042");
        let row = plugin.db.get_channel_default("10001").await.unwrap().unwrap();
        assert_eq!(row.default_game, "bf2042");
    }

    #[tokio::test]
    async fn test_help_uses_prefix() {
        let plugin = plugin(
            MockGameBackend::new(),
            MockGameBackend::new(),
            MockHtmlRenderer::new(),
        )
        .await;
        let replies = plugin.handle(Command::BfHelp, &ctx("bf_help", None, false)).await;
        assert!(text(&replies).contains("/bind ExamplePlayer"));
        assert!(text(&replies).contains("bf4, bf1, bfv"));
    }

    #[tokio::test]
    async fn test_render_failure_is_reported() {
        let mut legacy = MockGameBackend::new();
        legacy
            .expect_player_report()
            .returning(|r, _| Ok(report(r.game)));
        let mut renderer = MockHtmlRenderer::new();
        renderer
            .expect_render()
            .returning(|_, _| Err(PluginError::ImageGeneration("502".into())));
        let plugin = plugin(legacy, MockGameBackend::new(), renderer).await;
        let replies = plugin
            .handle(Command::Vehicles, &ctx("vehicles Shadow", None, false))
            .await;
        assert_eq!(text(&replies), "Image generation failed, please try again later");
    }

    #[tokio::test]
    async fn test_tool_stat_returns_narrative() {
        let mut tracker = MockGameBackend::new();
        tracker
            .expect_player_report()
            .withf(|r, q| r.ea_name.as_deref() == Some("Friend") && *q == Query::Summary)
            .returning(|r, _| Ok(report(r.game)));
        let plugin = plugin(MockGameBackend::new(), tracker, MockHtmlRenderer::new()).await;

        let sender = ctx("", None, false);
        let answer = plugin.tool_stat(&sender, Some("20002"), None, None).await;
        assert!(answer.starts_with("User 20002 has no bound EA account"));

        let answer = plugin.tool_bind(&sender, "Friend", Some("20002")).await;
        assert_eq!(answer, "Bound EA account Friend");

        let answer = plugin
            .tool_stat(&sender, Some("20002"), Some("bf6"), None)
            .await;
        assert!(answer.starts_with(&plugin.config().stat_prompt));
        assert!(answer.contains("in bf6 player Shadow"));
    }
}
