// Resolution of a command into a fully-specified player query.

use serde::Deserialize;

use crate::config::Config;
use crate::db::Database;
use crate::error::PluginError;
use crate::game::Game;
use crate::parser::parse_command_args;

/// Who sent a command, and where.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandContext {
    /// Full message text, trigger word included.
    pub message: String,
    pub sender_id: String,
    /// Set for group conversations; private chats leave it empty.
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl CommandContext {
    pub fn is_group(&self) -> bool {
        self.group_id.as_deref().is_some_and(|g| !g.is_empty())
    }

    /// Channel whose default game applies: the group, else the private chat.
    pub fn channel_id(&self) -> &str {
        match self.group_id.as_deref() {
            Some(group) if !group.is_empty() => group,
            _ => &self.sender_id,
        }
    }
}

/// How the positional argument of a command is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    /// A player; bound accounts fill in a missing name.
    Player,
    /// A server name; no binding lookup.
    Server,
    /// The account being bound; it must be given explicitly.
    Binding,
}

/// A fully-resolved query. Building one never issues upstream calls, and
/// any resolution failure is returned instead of a half-filled request.
#[derive(Debug, Clone)]
pub struct PlayerDataRequest {
    pub message: String,
    pub lang: String,
    pub requester_id: String,
    pub ea_name: Option<String>,
    pub pider: Option<String>,
    pub game: Game,
    pub server_name: Option<String>,
    pub page: u32,
}

impl PlayerDataRequest {
    /// Name used in replies and hints: the EA name, else the pider.
    pub fn display_name(&self) -> &str {
        self.ea_name
            .as_deref()
            .or(self.pider.as_deref())
            .unwrap_or("")
    }

    #[cfg(test)]
    pub fn for_test(game: Game, ea_name: Option<&str>) -> Self {
        PlayerDataRequest {
            message: String::new(),
            lang: game.lang().to_string(),
            requester_id: "10001".to_string(),
            ea_name: ea_name.map(str::to_string),
            pider: None,
            game,
            server_name: None,
            page: 1,
        }
    }
}

/// Pick the game: explicit code, else the channel default, else the
/// configured default. Aliases are accepted.
pub async fn resolve_game(
    db: &Database,
    config: &Config,
    explicit: Option<&str>,
    channel_id: &str,
) -> Result<Game, PluginError> {
    let code = match explicit {
        Some(code) => code.to_string(),
        None => match db.get_channel_default(channel_id).await? {
            Some(row) => row.default_game,
            None => config.default_game.clone(),
        },
    };
    Game::parse(&code).ok_or(PluginError::GameNotSupported { game: code })
}

/// Parse and resolve a chat command's argument.
pub async fn resolve_request(
    db: &Database,
    config: &Config,
    ctx: &CommandContext,
    triggers: &[&str],
    subject: Subject,
) -> Result<PlayerDataRequest, PluginError> {
    let args = parse_command_args(triggers, &ctx.message)?;
    let game = resolve_game(db, config, args.game.as_deref(), ctx.channel_id()).await?;

    let mut request = PlayerDataRequest {
        message: ctx.message.clone(),
        lang: game.lang().to_string(),
        requester_id: ctx.sender_id.clone(),
        ea_name: None,
        pider: args.pider.clone(),
        game,
        server_name: None,
        page: args.page,
    };

    match subject {
        Subject::Server => request.server_name = args.name,
        Subject::Binding => {
            if args.name.is_none() && args.pider.is_none() {
                return Err(PluginError::InvalidParameter {
                    parameter: "ea_name".to_string(),
                    value: None,
                    expected: None,
                });
            }
            request.ea_name = args.name;
        }
        Subject::Player if args.name.is_none() && args.pider.is_none() => {
            let binding = db
                .get_user_binding(&ctx.sender_id)
                .await?
                .ok_or(PluginError::UserNotBound { user_id: None })?;
            request.ea_name = Some(binding.ea_name).filter(|n| !n.is_empty());
            request.pider = Some(binding.ea_id).filter(|id| !id.is_empty());
        }
        Subject::Player => request.ea_name = args.name,
    }

    tracing::debug!(
        game = %request.game,
        player = request.display_name(),
        page = request.page,
        "Request resolved"
    );
    Ok(request)
}

/// Resolve a tool call. Without an explicit name the binding of `user_id`
/// (or of the sender) is used.
pub async fn resolve_tool_request(
    db: &Database,
    config: &Config,
    ctx: &CommandContext,
    ea_name: Option<&str>,
    user_id: Option<&str>,
    game: Option<&str>,
) -> Result<PlayerDataRequest, PluginError> {
    let requester = user_id
        .filter(|id| !id.is_empty())
        .unwrap_or(&ctx.sender_id)
        .to_string();
    let game = resolve_game(db, config, game.filter(|g| !g.is_empty()), ctx.channel_id()).await?;

    let (ea_name, pider) = match ea_name.filter(|n| !n.is_empty()) {
        Some(name) => (Some(name.to_string()), None),
        None => {
            let binding = db
                .get_user_binding(&requester)
                .await?
                .ok_or_else(|| PluginError::UserNotBound {
                    user_id: Some(requester.clone()),
                })?;
            (
                Some(binding.ea_name).filter(|n| !n.is_empty()),
                Some(binding.ea_id).filter(|id| !id.is_empty()),
            )
        }
    };

    Ok(PlayerDataRequest {
        message: ctx.message.clone(),
        lang: game.lang().to_string(),
        requester_id: requester,
        ea_name,
        pider,
        game,
        server_name: None,
        page: 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> (Database, Config) {
        let db = Database::new("sqlite::memory:").await.unwrap();
        (db, Config::default())
    }

    fn ctx(message: &str, group: Option<&str>) -> CommandContext {
        CommandContext {
            message: message.to_string(),
            sender_id: "10001".to_string(),
            group_id: group.map(str::to_string),
            is_admin: false,
        }
    }

    #[test]
    fn test_channel_id() {
        assert_eq!(ctx("", Some("g1")).channel_id(), "g1");
        assert_eq!(ctx("", None).channel_id(), "10001");
        assert_eq!(ctx("", Some("")).channel_id(), "10001");
        assert!(!ctx("", Some("")).is_group());
    }

    #[tokio::test]
    async fn test_explicit_arguments() {
        let (db, config) = setup().await;
        let request = resolve_request(
            &db,
            &config,
            &ctx("stat Shadow,game=bf5", None),
            &["stat"],
            Subject::Player,
        )
        .await
        .unwrap();
        assert_eq!(request.game, Game::Bfv);
        assert_eq!(request.ea_name.as_deref(), Some("Shadow"));
        assert_eq!(request.lang, "zh-cn");
        assert_eq!(request.page, 1);
    }

    #[tokio::test]
    async fn test_game_from_channel_then_config() {
        let (db, config) = setup().await;
        let plain = ctx("stat Shadow", Some("g1"));
        let request = resolve_request(&db, &config, &plain, &["stat"], Subject::Player)
            .await
            .unwrap();
        assert_eq!(request.game, Game::Bfv);

        db.upsert_channel_default("g1", "bf1").await.unwrap();
        let request = resolve_request(&db, &config, &plain, &["stat"], Subject::Player)
            .await
            .unwrap();
        assert_eq!(request.game, Game::Bf1);
        assert_eq!(request.lang, "zh-tw");
    }

    #[tokio::test]
    async fn test_unsupported_game() {
        let (db, config) = setup().await;
        let err = resolve_request(
            &db,
            &config,
            &ctx("stat Shadow,game=bf3", None),
            &["stat"],
            Subject::Player,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), "GAME_NOT_SUPPORTED");
        assert!(err.user_message().contains("bf2042"));
    }

    #[tokio::test]
    async fn test_binding_fills_missing_name() {
        let (db, config) = setup().await;
        let err = resolve_request(&db, &config, &ctx("stat", None), &["stat"], Subject::Player)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "USER_NOT_BOUND");

        db.upsert_user_binding("10001", "Shadow", "").await.unwrap();
        let request = resolve_request(&db, &config, &ctx("stat", None), &["stat"], Subject::Player)
            .await
            .unwrap();
        assert_eq!(request.ea_name.as_deref(), Some("Shadow"));
        assert_eq!(request.pider, None);

        db.upsert_user_binding("10001", "Shadow", "1001").await.unwrap();
        let request = resolve_request(&db, &config, &ctx("stat", None), &["stat"], Subject::Player)
            .await
            .unwrap();
        assert_eq!(request.pider.as_deref(), Some("1001"));
    }

    #[tokio::test]
    async fn test_explicit_pider_skips_binding() {
        let (db, config) = setup().await;
        let request = resolve_request(
            &db,
            &config,
            &ctx("stat pider=1001", None),
            &["stat"],
            Subject::Player,
        )
        .await
        .unwrap();
        assert_eq!(request.ea_name, None);
        assert_eq!(request.display_name(), "1001");
    }

    #[tokio::test]
    async fn test_server_and_binding_subjects() {
        let (db, config) = setup().await;
        let request = resolve_request(
            &db,
            &config,
            &ctx("servers ABC,game=bf1", None),
            &["servers"],
            Subject::Server,
        )
        .await
        .unwrap();
        assert_eq!(request.server_name.as_deref(), Some("ABC"));
        assert_eq!(request.ea_name, None);

        let err = resolve_request(&db, &config, &ctx("bind", None), &["bind"], Subject::Binding)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Missing required parameter: ea_name");
    }

    #[tokio::test]
    async fn test_tool_request() {
        let (db, config) = setup().await;
        let sender = ctx("", None);

        let err = resolve_tool_request(&db, &config, &sender, None, Some("20002"), None)
            .await
            .unwrap_err();
        match err {
            PluginError::UserNotBound { user_id } => assert_eq!(user_id.as_deref(), Some("20002")),
            other => panic!("unexpected {other:?}"),
        }

        db.upsert_user_binding("20002", "Friend", "").await.unwrap();
        let request = resolve_tool_request(&db, &config, &sender, None, Some("20002"), Some("2042"))
            .await
            .unwrap();
        assert_eq!(request.ea_name.as_deref(), Some("Friend"));
        assert_eq!(request.game, Game::Bf2042);
        assert_eq!(request.requester_id, "20002");

        let request = resolve_tool_request(&db, &config, &sender, Some("Other"), None, None)
            .await
            .unwrap();
        assert_eq!(request.ea_name.as_deref(), Some("Other"));
        assert_eq!(request.requester_id, "10001");
    }
}
