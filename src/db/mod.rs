// Database access layer (SQLite via sqlx): account bindings and channel defaults.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// A chat user's remembered EA account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserBinding {
    pub user_id: String,
    pub ea_name: String,
    /// Alternate id (pider). Empty when only a name was bound.
    pub ea_id: String,
    pub updated_at: String,
}

/// Default game for one conversation channel.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChannelDefault {
    pub channel_id: String,
    pub default_game: String,
    pub updated_at: String,
}

/// Whether an upsert inserted a new row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

impl Upsert {
    /// Rows start at revision 0 and every conflicting write bumps it.
    fn from_revision(revision: i64) -> Self {
        if revision == 0 {
            Upsert::Created
        } else {
            Upsert::Updated
        }
    }
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_bindings (
                user_id TEXT PRIMARY KEY,
                ea_name TEXT NOT NULL DEFAULT '',
                ea_id TEXT NOT NULL DEFAULT '',
                revision INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS channel_defaults (
                channel_id TEXT PRIMARY KEY,
                default_game TEXT NOT NULL,
                revision INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ── User bindings ─────────────────────────────────────────────────

    pub async fn upsert_user_binding(
        &self,
        user_id: &str,
        ea_name: &str,
        ea_id: &str,
    ) -> Result<Upsert, sqlx::Error> {
        let revision: i64 = sqlx::query_scalar(
            "INSERT INTO user_bindings (user_id, ea_name, ea_id) VALUES (?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                ea_name = excluded.ea_name,
                ea_id = excluded.ea_id,
                revision = user_bindings.revision + 1,
                updated_at = datetime('now')
             RETURNING revision",
        )
        .bind(user_id)
        .bind(ea_name)
        .bind(ea_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(Upsert::from_revision(revision))
    }

    pub async fn get_user_binding(&self, user_id: &str) -> Result<Option<UserBinding>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserBinding>(
            "SELECT user_id, ea_name, ea_id, updated_at FROM user_bindings WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // ── Channel defaults ──────────────────────────────────────────────

    pub async fn upsert_channel_default(
        &self,
        channel_id: &str,
        default_game: &str,
    ) -> Result<Upsert, sqlx::Error> {
        let revision: i64 = sqlx::query_scalar(
            "INSERT INTO channel_defaults (channel_id, default_game) VALUES (?, ?)
             ON CONFLICT(channel_id) DO UPDATE SET
                default_game = excluded.default_game,
                revision = channel_defaults.revision + 1,
                updated_at = datetime('now')
             RETURNING revision",
        )
        .bind(channel_id)
        .bind(default_game)
        .fetch_one(&self.pool)
        .await?;
        Ok(Upsert::from_revision(revision))
    }

    pub async fn get_channel_default(
        &self,
        channel_id: &str,
    ) -> Result<Option<ChannelDefault>, sqlx::Error> {
        let row = sqlx::query_as::<_, ChannelDefault>(
            "SELECT channel_id, default_game, updated_at FROM channel_defaults WHERE channel_id = ?",
        )
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
