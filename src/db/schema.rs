//! SQL DDL for initializing the credential storage.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `created_at` / `updated_at` as RFC3339 text (UTC, nanosecond precision)
/// - `tags` JSON array, serialized as text
/// - index on `created_at` for newest-first listing
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS credentials (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    password TEXT NOT NULL,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL, -- RFC3339
    description TEXT NULL,
    tags TEXT NULL -- JSON array, serialized as text
);

CREATE INDEX IF NOT EXISTS idx_credentials_created_at ON credentials(created_at);
"#;
