use crate::db::models::{
    Credential, NewCredential, decode_tags, decode_timestamp, encode_tags, encode_timestamp,
};
use crate::db::schema::SQLITE_INIT;
use crate::error::VaultError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;

/// Shared handle to the credential table. Clones share one pool.
#[derive(Clone)]
pub struct CredentialsStorage {
    pool: SqlitePool,
}

impl CredentialsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database file and ensure the schema exists.
    pub async fn connect(path: &Path) -> Result<Self, VaultError> {
        let connect_opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        info!(path = %path.display(), "credential store ready");
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), VaultError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a new row with both timestamps set to now. Returns the row id.
    pub async fn insert(&self, cred: &NewCredential) -> Result<i64, VaultError> {
        let tags_json = encode_tags(cred.tags.as_deref())
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let now = encode_timestamp(&Utc::now());
        let result = sqlx::query(
            r#"
            INSERT INTO credentials (
                username, password, description, tags, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(cred.username.as_str())
        .bind(cred.password.as_str())
        .bind(cred.description.as_deref().unwrap_or_default())
        .bind(tags_json)
        .bind(now.clone())
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "credential inserted");
        Ok(id)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Credential, VaultError> {
        let row = sqlx::query(
            r#"SELECT id, username, password, description, tags, created_at, updated_at
               FROM credentials WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(VaultError::NotFound)?;
        Self::row_to_model(row)
    }

    /// All credentials, newest first.
    pub async fn list_all(&self) -> Result<Vec<Credential>, VaultError> {
        let rows = sqlx::query(
            r#"SELECT id, username, password, description, tags, created_at, updated_at
               FROM credentials ORDER BY created_at DESC, id DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    /// Overwrite the mutable fields by id and refresh `updated_at`.
    pub async fn update_by_id(&self, id: i64, cred: &NewCredential) -> Result<(), VaultError> {
        let tags_json = encode_tags(cred.tags.as_deref())
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let now = encode_timestamp(&Utc::now());
        let result = sqlx::query(
            r#"UPDATE credentials SET
                username = ?,
                password = ?,
                description = ?,
                tags = ?,
                updated_at = ?
              WHERE id = ?"#,
        )
        .bind(cred.username.as_str())
        .bind(cred.password.as_str())
        .bind(cred.description.as_deref().unwrap_or_default())
        .bind(tags_json)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(VaultError::NotFound);
        }
        debug!(id, "credential updated");
        Ok(())
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), VaultError> {
        let result = sqlx::query("DELETE FROM credentials WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(VaultError::NotFound);
        }
        debug!(id, "credential deleted");
        Ok(())
    }

    /// Close every pooled connection. Call once at shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_model(row: SqliteRow) -> Result<Credential, VaultError> {
        let id: i64 = row.try_get("id")?;
        let username: String = row.try_get("username")?;
        let password: String = row.try_get("password")?;
        let description: Option<String> = row.try_get("description")?;
        let tags_json: Option<String> = row.try_get("tags")?;
        let created_str: String = row.try_get("created_at")?;
        let updated_str: String = row.try_get("updated_at")?;

        let tags =
            decode_tags(tags_json.as_deref()).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let created_at =
            decode_timestamp(&created_str).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let updated_at =
            decode_timestamp(&updated_str).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Credential {
            id,
            username,
            password,
            created_at,
            updated_at,
            description: description.unwrap_or_default(),
            tags,
        })
    }
}
