//! SQL for the `flags` table.
//! The DDL is portable between PostgreSQL and SQLite; DML differs only in
//! placeholder syntax.

/// One row per named flag:
/// - `name` VARCHAR(99) PRIMARY KEY
/// - `enabled` BOOLEAN (SQLite stores it as INTEGER 0/1)
pub const FLAGS_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS flags (
    name VARCHAR(99) PRIMARY KEY,
    enabled BOOLEAN
);
"#;

pub mod pg {
    pub const INSERT_DEFAULT: &str =
        "INSERT INTO flags (name, enabled) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING";
    pub const SELECT_ENABLED: &str = "SELECT name, enabled FROM flags WHERE name = $1";
    pub const UPDATE_ENABLED: &str = "UPDATE flags SET enabled = $1 WHERE name = $2";
}

pub mod sqlite {
    pub const INSERT_DEFAULT: &str =
        "INSERT INTO flags (name, enabled) VALUES (?, ?) ON CONFLICT (name) DO NOTHING";
    pub const SELECT_ENABLED: &str = "SELECT name, enabled FROM flags WHERE name = ?";
    pub const UPDATE_ENABLED: &str = "UPDATE flags SET enabled = ? WHERE name = ?";
}

/// Split the bundled DDL into individual statements; `sqlx::query` runs one at a time.
pub fn statements(ddl: &str) -> impl Iterator<Item = &str> {
    ddl.split(';').map(str::trim).filter(|s| !s.is_empty())
}
