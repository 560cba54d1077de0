use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::models::{Page, Todo};

const TODO_COLUMNS: &str = "id, subject, description, created_at, updated_at";

/// SQLite's default ceiling on bound parameters in one statement.
pub const MAX_DELETE_IDS: usize = 32_766;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn()?
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS todos (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    subject TEXT NOT NULL CHECK(subject <> ''),
                    description TEXT NOT NULL DEFAULT '',
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                "#,
            )
            .context("Failed to initialize schema")?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Database connection lock poisoned"))
    }

    pub fn insert_todo(&self, subject: &str, description: &str, now: DateTime<Utc>) -> Result<i64> {
        let conn = self.conn()?;
        let now = now.to_rfc3339();
        conn.execute(
            "INSERT INTO todos (subject, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![subject, description, now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_todos(&self, page: Page) -> Result<Vec<Todo>> {
        let conn = self.conn()?;

        let todos = match page {
            Page::All => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {TODO_COLUMNS} FROM todos ORDER BY id DESC"
                ))?;
                let rows = stmt.query_map([], row_to_todo)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            Page::Latest { size } => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {TODO_COLUMNS} FROM todos ORDER BY id DESC LIMIT ?1"
                ))?;
                let rows = stmt.query_map([size], row_to_todo)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            Page::Before { prev_id, size } => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {TODO_COLUMNS} FROM todos WHERE id < ?1 ORDER BY id DESC LIMIT ?2"
                ))?;
                let rows = stmt.query_map(params![prev_id, size], row_to_todo)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        Ok(todos)
    }

    /// Returns the number of rows changed; 0 means no row has `id`.
    pub fn update_todo(
        &self,
        id: i64,
        subject: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let rows = self.conn()?.execute(
            "UPDATE todos SET subject = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
            params![subject, description, now.to_rfc3339(), id],
        )?;
        Ok(rows)
    }

    /// Deletes every row whose id is in `ids` with a single statement.
    pub fn delete_todos(&self, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        if ids.len() > MAX_DELETE_IDS {
            bail!(
                "Too many ids in one delete: {} (limit {})",
                ids.len(),
                MAX_DELETE_IDS
            );
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("DELETE FROM todos WHERE id IN ({placeholders})");
        let rows = self.conn()?.execute(&sql, params_from_iter(ids.iter()))?;
        Ok(rows)
    }
}

fn row_to_todo(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        subject: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        created_at: parse_datetime(row.get::<_, String>(3)?),
        updated_at: parse_datetime(row.get::<_, String>(4)?),
    })
}

/// Accepts RFC 3339 or SQLite's `DATETIME('now')` format (UTC). Anything
/// else is logged and read as the current time.
fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc()))
        .unwrap_or_else(|e| {
            tracing::warn!(value = %s, error = %e, "Unparsable stored timestamp, using current time");
            Utc::now()
        })
}
