//! # Key/Value Repository
//!
//! Named string slots in the `key_value_store` table. The sales store keeps
//! its whole collection as one JSON document under a single key, the same
//! way the browser dashboard used local storage.
//!
//! ```text
//! ┌──────────────────────┬───────────────────────────────┬─────────────────────┐
//! │ key                  │ value                         │ updated_at          │
//! ├──────────────────────┼───────────────────────────────┼─────────────────────┤
//! │ iptv_sales           │ [{"id":"…","clientName":…}]   │ 2024-01-15T10:00:…  │
//! └──────────────────────┴───────────────────────────────┴─────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for key/value operations.
#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }

    /// Reads a key. `None` when the key was never written.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM key_value_store WHERE key = ?1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    /// Writes a key, replacing any previous value.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing key");

        sqlx::query(
            r#"
            INSERT INTO key_value_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_get_missing_key() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(db.key_values().get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.key_values();

        kv.set("iptv_sales", "[]").await.unwrap();
        kv.set("iptv_sales", "[1]").await.unwrap();

        assert_eq!(kv.get("iptv_sales").await.unwrap().as_deref(), Some("[1]"));
    }
}
