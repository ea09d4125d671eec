// Tool definitions offered to an LLM agent, and their argument types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::request::CommandContext;

pub const BIND_TOOL: &str = "bf_tool_bind";
pub const STAT_TOOL: &str = "bf_tool_stat";

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: BIND_TOOL,
            description: "Bind the EA account name that Battlefield lookups use by default",
            parameters: json!({
                "type": "object",
                "properties": {
                    "ea_name": {
                        "type": "string",
                        "description": "EA account name to bind, required"
                    },
                    "user_id": {
                        "type": "string",
                        "description": "Id of another user to bind for; omit to bind for the sender"
                    }
                },
                "required": ["ea_name"]
            }),
        },
        ToolDefinition {
            name: STAT_TOOL,
            description: "Look up a player's Battlefield career statistics",
            parameters: json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "Id of another user whose bound account to query; omit unless the user names one"
                    },
                    "game": {
                        "type": "string",
                        "description": "Game code: bf4, bf1, bfv, bf2042 or bf6; omit unless the user names one"
                    },
                    "ea_name": {
                        "type": "string",
                        "description": "EA account name (not a user id) of another player; omit unless the user names one"
                    }
                }
            }),
        },
    ]
}

/// Body of a tool invocation: who asked, and the agent's arguments.
#[derive(Debug, Deserialize)]
pub struct ToolCall<A> {
    #[serde(default)]
    pub context: CommandContext,
    pub arguments: A,
}

#[derive(Debug, Deserialize)]
pub struct BindArgs {
    pub ea_name: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatArgs {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub ea_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions() {
        let tools = definitions();
        let names: Vec<&str> = tools.iter().map(|t| t.name).collect();
        assert_eq!(names, vec![BIND_TOOL, STAT_TOOL]);
        assert_eq!(tools[0].parameters["required"], json!(["ea_name"]));
        assert!(tools[1].parameters.get("required").is_none());
    }

    #[test]
    fn test_tool_call_decoding() {
        let call: ToolCall<StatArgs> = serde_json::from_value(json!({
            "context": {"message": "", "sender_id": "10001"},
            "arguments": {"game": "bf6"}
        }))
        .unwrap();
        assert_eq!(call.context.sender_id, "10001");
        assert_eq!(call.arguments.game.as_deref(), Some("bf6"));
        assert_eq!(call.arguments.ea_name, None);

        let missing = serde_json::from_value::<ToolCall<BindArgs>>(json!({"arguments": {}}));
        assert!(missing.is_err());
    }
}
