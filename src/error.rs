// Error taxonomy for command handling.
//
// `Display` carries the developer message that goes to the logs;
// `user_message()` is what the chat user sees.

use crate::game::Game;

/// One account candidate returned when a display name is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCandidate {
    pub handle: String,
    pub identifier: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("network request failed: {0}")]
    Network(String),

    #[error("no response within {0} seconds")]
    Timeout(u64),

    #[error("upstream returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode upstream data: {0}")]
    Parse(String),

    /// The free-text argument did not match the command grammar.
    #[error("malformed command input: {0}")]
    UserInput(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("image rendering failed: {0}")]
    ImageGeneration(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("no text-generation provider configured")]
    ProviderNotConfigured,

    #[error("permission denied for {operation}")]
    PermissionDenied { operation: String },

    #[error("game `{game}` is not supported")]
    GameNotSupported { game: String },

    #[error("game `{game}` does not support {operation}")]
    GameNotSupportedForOperation {
        game: String,
        operation: String,
        supported: Vec<Game>,
    },

    #[error("no account bound for {}", user_id.as_deref().unwrap_or("requester"))]
    UserNotBound { user_id: Option<String> },

    #[error("invalid parameter `{parameter}`")]
    InvalidParameter {
        parameter: String,
        value: Option<String>,
        expected: Option<String>,
    },

    #[error("page exceeds limit of {max}")]
    PageLimitExceeded { max: u32 },

    #[error("player data is private")]
    PrivateData,

    #[error("{} accounts share the name `{name}`", candidates.len())]
    MultipleUsers {
        name: String,
        candidates: Vec<AccountCandidate>,
        prefix: String,
    },

    /// The legacy API rejected the lookup; `detail` is its error text.
    #[error("player `{name}` not found for {game}: {detail}")]
    PlayerNotFound {
        name: String,
        game: String,
        detail: String,
    },

    #[error("no {0} available")]
    NoData(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub const SYSTEM_EXCEPTION_MESSAGE: &str =
    "System exception, please try again later or contact the developer";

impl PluginError {
    /// Stable error code, used in logs and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            PluginError::Network(_) => "NETWORK_ERROR",
            PluginError::Timeout(_) => "TIMEOUT_ERROR",
            PluginError::Api { .. } => "API_ERROR",
            PluginError::Parse(_) => "PARSE_ERROR",
            PluginError::UserInput(_) => "INPUT_ERROR",
            PluginError::Database(_) => "DATABASE_ERROR",
            PluginError::ImageGeneration(_) => "IMAGE_ERROR",
            PluginError::Configuration(_) => "CONFIG_ERROR",
            PluginError::ProviderNotConfigured => "PROVIDER_NOT_CONFIGURED",
            PluginError::PermissionDenied { .. } => "PERMISSION_DENIED",
            PluginError::GameNotSupported { .. } => "GAME_NOT_SUPPORTED",
            PluginError::GameNotSupportedForOperation { .. } => "GAME_NOT_SUPPORTED_FOR_OPERATION",
            PluginError::UserNotBound { .. } => "USER_NOT_BOUND",
            PluginError::InvalidParameter { .. } => "INVALID_PARAMETER",
            PluginError::PageLimitExceeded { .. } => "PAGE_LIMIT_EXCEEDED",
            PluginError::PrivateData => "PRIVATE_DATA",
            PluginError::MultipleUsers { .. } => "MULTIPLE_USERS",
            PluginError::PlayerNotFound { .. } => "PLAYER_NOT_FOUND",
            PluginError::NoData(_) => "NO_DATA",
            PluginError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure points at our side (or a collaborator) rather than
    /// at what the user typed. Decides the log level at the boundary.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            PluginError::Parse(_)
                | PluginError::Database(_)
                | PluginError::ImageGeneration(_)
                | PluginError::Configuration(_)
                | PluginError::ProviderNotConfigured
                | PluginError::Internal(_)
        )
    }

    /// Text shown to the chat user. Never contains internal detail.
    pub fn user_message(&self) -> String {
        match self {
            PluginError::Network(_) => {
                "Network connection failed, please try again later".to_string()
            }
            PluginError::Timeout(_) => "Request timed out, please try again later".to_string(),
            PluginError::Api { .. } => {
                "Failed to fetch data, please check your input or try again later".to_string()
            }
            PluginError::Parse(_) => {
                "Failed to read the returned data, please contact the developer".to_string()
            }
            PluginError::UserInput(hint) => hint.clone(),
            PluginError::Database(_) => {
                "Database operation failed, please try again later".to_string()
            }
            PluginError::ImageGeneration(_) => {
                "Image generation failed, please try again later".to_string()
            }
            PluginError::Configuration(_) => {
                "Configuration error, please check the plugin settings".to_string()
            }
            PluginError::ProviderNotConfigured => {
                "Commentary is not configured, please set a text-generation provider".to_string()
            }
            PluginError::PermissionDenied { operation } => {
                format!("Permission denied: only bot administrators can use {operation}")
            }
            PluginError::GameNotSupported { game } => format!(
                "Game '{game}' not found\n• Check that the game code is correct\n• Available codes: {}",
                Game::supported_codes()
            ),
            PluginError::GameNotSupportedForOperation {
                game,
                operation,
                supported,
            } => {
                if supported.is_empty() {
                    format!("{operation} does not support {game}")
                } else {
                    let codes: Vec<&str> = supported.iter().map(|g| g.code()).collect();
                    format!(
                        "{operation} only supports {}, not {game}",
                        codes.join(", ")
                    )
                }
            }
            PluginError::UserNotBound { user_id: Some(id) } => format!(
                "User {id} has no bound EA account, please bind one first with bind [ea_name]"
            ),
            PluginError::UserNotBound { user_id: None } => {
                "Please bind an account first with bind [ea_name]".to_string()
            }
            PluginError::InvalidParameter {
                parameter,
                value,
                expected,
            } => match (value, expected) {
                (Some(v), Some(e)) => {
                    format!("Parameter '{parameter}' value '{v}' is invalid, expected: {e}")
                }
                (Some(v), None) => format!("Parameter '{parameter}' value '{v}' is invalid"),
                _ => format!("Missing required parameter: {parameter}"),
            },
            PluginError::PageLimitExceeded { max } => {
                format!("Page number exceeds the limit, at most {max} pages are supported")
            }
            PluginError::PrivateData => {
                "Player data is private, enable Settings -> System -> Game data sharing"
                    .to_string()
            }
            PluginError::MultipleUsers {
                name,
                candidates,
                prefix,
            } => {
                let mut msg = String::from("Multiple accounts found:\n");
                for c in candidates {
                    msg.push_str(&format!(
                        "Name: {}, pider: {}, try:\n{prefix}stat pider={}\n{prefix}bind {name},pider={}\n\n",
                        c.handle, c.identifier, c.identifier, c.identifier
                    ));
                }
                msg.push_str(
                    "Use stat to check each record and find yours, then bind your pider with bind",
                );
                msg
            }
            PluginError::PlayerNotFound { name, game, .. } => format!(
                "Player '{name}' was not found on {game}, or the game code is wrong\n\
                 • Legacy game codes: {}",
                Game::legacy_codes()
            ),
            PluginError::NoData(kind) => format!("No {kind} available"),
            PluginError::Internal(_) => SYSTEM_EXCEPTION_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(PluginError::Network("x".into()).code(), "NETWORK_ERROR");
        assert_eq!(PluginError::PrivateData.code(), "PRIVATE_DATA");
        assert_eq!(PluginError::NoData("data".into()).code(), "NO_DATA");
        assert_eq!(
            PluginError::PageLimitExceeded { max: 25 }.code(),
            "PAGE_LIMIT_EXCEEDED"
        );
    }

    #[test]
    fn test_user_message_hides_internal_detail() {
        let err = PluginError::Internal("index out of bounds at plugin.rs:42".into());
        assert_eq!(err.user_message(), SYSTEM_EXCEPTION_MESSAGE);
        assert!(err.to_string().contains("plugin.rs:42"));

        let err = PluginError::Api {
            status: 500,
            body: "{\"trace\":\"secret\"}".into(),
        };
        assert!(!err.user_message().contains("secret"));
    }

    #[test]
    fn test_unsupported_game_lists_supported_set() {
        let err = PluginError::GameNotSupported {
            game: "bf3".into(),
        };
        let msg = err.user_message();
        assert!(msg.contains("'bf3'"));
        for code in ["bf4", "bf1", "bfv", "bf6", "bf2042"] {
            assert!(msg.contains(code), "missing {code} in {msg}");
        }
    }

    #[test]
    fn test_multiple_users_message_lists_candidates() {
        let err = PluginError::MultipleUsers {
            name: "Shadow".into(),
            candidates: vec![
                AccountCandidate {
                    handle: "Shadow".into(),
                    identifier: "1001".into(),
                },
                AccountCandidate {
                    handle: "shadow".into(),
                    identifier: "1002".into(),
                },
            ],
            prefix: "/".into(),
        };
        let msg = err.user_message();
        assert!(msg.contains("/stat pider=1001"));
        assert!(msg.contains("/bind Shadow,pider=1002"));
        assert_eq!(err.to_string(), "2 accounts share the name `Shadow`");
    }

    #[test]
    fn test_invalid_parameter_variants() {
        let missing = PluginError::InvalidParameter {
            parameter: "server_name".into(),
            value: None,
            expected: None,
        };
        assert_eq!(missing.user_message(), "Missing required parameter: server_name");

        let wrong = PluginError::InvalidParameter {
            parameter: "page".into(),
            value: Some("x".into()),
            expected: Some("a number".into()),
        };
        assert!(wrong.user_message().contains("expected: a number"));
    }

    #[test]
    fn test_operation_support_message() {
        let err = PluginError::GameNotSupportedForOperation {
            game: "bfv".into(),
            operation: "Soldier lookup".into(),
            supported: vec![Game::Bf2042, Game::Bf6],
        };
        assert_eq!(
            err.user_message(),
            "Soldier lookup only supports bf2042, bf6, not bfv"
        );
    }

    #[test]
    fn test_player_not_found_lists_legacy_codes() {
        let err = PluginError::PlayerNotFound {
            name: "Ghost".into(),
            game: "bf1".into(),
            detail: "player not found".into(),
        };
        let msg = err.user_message();
        assert!(msg.contains("'Ghost'"));
        assert!(msg.contains("bf4, bf1, bfv"));
        assert!(!msg.contains("bf2042"));
        assert_eq!(err.code(), "PLAYER_NOT_FOUND");
    }

    #[test]
    fn test_fault_classification() {
        assert!(PluginError::Parse("x".into()).is_fault());
        assert!(!PluginError::PrivateData.is_fault());
        assert!(!PluginError::UserNotBound { user_id: None }.is_fault());
    }
}
