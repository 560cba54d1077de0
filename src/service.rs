//! CRUD over TODO items.
//!
//! SQLite calls block, so every database touch runs on tokio's blocking pool.
//! Returned timestamps come from the clock at the time of the call rather than
//! being read back from the row; on update the returned `created_at` is that
//! same instant, not the stored creation time.

use anyhow::anyhow;
use chrono::Utc;
use std::sync::Arc;

use crate::db::Database;
use crate::error::ServiceError;
use crate::models::{Page, Todo};

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[derive(Clone)]
pub struct TodoService {
    db: Arc<Database>,
}

impl TodoService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn with_db<T, F>(&self, f: F) -> ServiceResult<T>
    where
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| anyhow!("database task failed: {e}"))?
            .map_err(ServiceError::from)
    }

    pub async fn create_todo(&self, subject: &str, description: &str) -> ServiceResult<Todo> {
        if subject.is_empty() {
            return Err(ServiceError::validation("subject must not be empty"));
        }

        let now = Utc::now();
        let (subject, description) = (subject.to_string(), description.to_string());
        let (id, subject, description) = self
            .with_db(move |db| {
                let id = db.insert_todo(&subject, &description, now)?;
                Ok((id, subject, description))
            })
            .await?;

        tracing::debug!(id, "Created todo");
        Ok(Todo {
            id,
            subject,
            description,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reads newest first. See [`Page::from_cursor`] for how `prev_id` and
    /// `size` select rows.
    pub async fn read_todos(&self, prev_id: i64, size: i64) -> ServiceResult<Vec<Todo>> {
        let page = Page::from_cursor(prev_id, size);
        let todos = self.with_db(move |db| db.list_todos(page)).await?;
        tracing::debug!(?page, count = todos.len(), "Read todos");
        Ok(todos)
    }

    pub async fn update_todo(
        &self,
        id: i64,
        subject: &str,
        description: &str,
    ) -> ServiceResult<Todo> {
        if subject.is_empty() {
            return Err(ServiceError::validation("subject must not be empty"));
        }

        let now = Utc::now();
        let (subject, description) = (subject.to_string(), description.to_string());
        let (rows, subject, description) = self
            .with_db(move |db| {
                let rows = db.update_todo(id, &subject, &description, now)?;
                Ok((rows, subject, description))
            })
            .await?;

        if rows == 0 {
            return Err(ServiceError::not_found(format!("todo {id} does not exist")));
        }

        tracing::debug!(id, "Updated todo");
        Ok(Todo {
            id,
            subject,
            description,
            created_at: now,
            updated_at: now,
        })
    }

    /// Succeeds if at least one of `ids` existed.
    pub async fn delete_todos(&self, ids: &[i64]) -> ServiceResult<()> {
        if ids.is_empty() {
            return Err(ServiceError::validation("ids must not be empty"));
        }

        let owned = ids.to_vec();
        let rows = self.with_db(move |db| db.delete_todos(&owned)).await?;
        if rows == 0 {
            return Err(ServiceError::not_found(format!("none of {ids:?} exist")));
        }

        tracing::debug!(requested = ids.len(), deleted = rows, "Deleted todos");
        Ok(())
    }
}
