// LLM-friendly documentation endpoint content.

const LLMS_TXT: &str = r#"# Battlefield Stats Plugin API
> Player statistics for Battlefield 4, 1, V, 2042 and 6, answered as rendered images or plain text.

## API Base URL
/api/

## Chat commands
POST /api/commands/{command} with a JSON body
`{"message": "<full message text>", "sender_id": "<user>", "group_id": "<group or null>", "is_admin": false}`.
The answer is `{"replies": [...]}` where each reply is `{"type": "text", "text": ...}` or
`{"type": "image", "url": ...}`. Failures are a single text reply.

Commands and aliases (argument grammar: `name[,game=G][,pider=P][,page=N]`):
- {prefix}stat - Career summary card
- {prefix}weapons, {prefix}武器 - Weapon list
- {prefix}vehicles, {prefix}载具 - Vehicle list
- {prefix}soldiers, {prefix}士兵 - Soldier list (bf2042, bf6)
- {prefix}recent, {prefix}最近, {prefix}战报 - Recent match report with commentary (bf6)
- {prefix}servers, {prefix}服务器 - Server search (bf4, bf1, bfv)
- {prefix}bind, {prefix}绑定 - Bind the sender's EA account
- {prefix}bf_init - Set this channel's default game (admins only in groups)
- {prefix}bf_help - Usage help

Game codes: bf4, bf1, bfv (alias bf5), bf6, bf2042 (alias 2042).

## LLM tools
- GET /api/tools - Tool definitions with JSON schemas
- POST /api/tools/bf_tool_bind - `{"context": {...}, "arguments": {"ea_name": ..., "user_id": ...}}`
- POST /api/tools/bf_tool_stat - `{"context": {...}, "arguments": {"user_id": ..., "game": ..., "ea_name": ...}}`
Both answer `{"text": ...}`.

## Other endpoints
- GET /api/help - Usage help as plain text
- GET /health - Health probe
- GET /metrics - Prometheus metrics
"#;

/// Documentation with the configured wake prefix filled in.
pub fn render(prefix: &str) -> String {
    LLMS_TXT.replace("{prefix}", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_substituted() {
        let text = render("#");
        assert!(text.contains("- #stat - Career summary card"));
        assert!(!text.contains("{prefix}"));
        assert!(text.contains("POST /api/commands/{command}"));
    }
}
