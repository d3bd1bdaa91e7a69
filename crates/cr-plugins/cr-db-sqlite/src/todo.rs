//! `TodoRepo` on SQLite.

use async_trait::async_trait;
use cr_core::error::Result;
use cr_core::todo::{History, Selection, Timeblock, TimeblockPlan, Todo};
use cr_core::traits::TodoRepo;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::{blob_to_uuid, db_err, uuid_to_blob};

pub struct SqliteTodoRepo {
    pool: SqlitePool,
}

impl SqliteTodoRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn todos_in_block(&self, timeblock_id: Uuid) -> Result<Vec<Todo>> {
        let rows = sqlx::query(
            "SELECT t.id, t.subject, t.description, t.start_time, t.end_time, t.done, t.reminder \
             FROM todos t JOIN timeblock_todos bt ON bt.todo_id = t.id \
             WHERE bt.timeblock_id = ? ORDER BY t.subject",
        )
        .bind(uuid_to_blob(timeblock_id))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(todo_from_row).collect::<sqlx::Result<_>>().map_err(db_err)
    }
}

fn todo_from_row(row: &SqliteRow) -> sqlx::Result<Todo> {
    Ok(Todo {
        id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id")?),
        subject: row.try_get("subject")?,
        description: row.try_get("description")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        done: row.try_get("done")?,
        reminder: row.try_get("reminder")?,
    })
}

fn history_from_row(row: &SqliteRow) -> sqlx::Result<History> {
    Ok(History {
        id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id")?),
        todo: row.try_get("todo")?,
        rank: row.try_get("rank")?,
    })
}

#[async_trait]
impl TodoRepo for SqliteTodoRepo {
    async fn create_todo(&self, todo: Todo) -> Result<()> {
        todo.validate()?;
        sqlx::query(
            "INSERT INTO todos (id, subject, description, start_time, end_time, done, reminder) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(todo.id))
        .bind(todo.subject)
        .bind(todo.description)
        .bind(todo.start_time)
        .bind(todo.end_time)
        .bind(todo.done)
        .bind(todo.reminder)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn save_todo(&self, mut todo: Todo) -> Result<Todo> {
        todo.validate()?;
        todo.touch();
        let result = sqlx::query(
            "UPDATE todos SET subject = ?, description = ?, start_time = ?, end_time = ?, \
             done = ?, reminder = ? WHERE id = ?",
        )
        .bind(&todo.subject)
        .bind(&todo.description)
        .bind(todo.start_time)
        .bind(todo.end_time)
        .bind(todo.done)
        .bind(todo.reminder)
        .bind(uuid_to_blob(todo.id))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(cr_core::AppError::NotFound("Todo".into(), todo.id.to_string()));
        }
        Ok(todo)
    }

    async fn get_todo(&self, id: Uuid) -> Result<Option<Todo>> {
        let row = sqlx::query(
            "SELECT id, subject, description, start_time, end_time, done, reminder FROM todos WHERE id = ?",
        )
        .bind(uuid_to_blob(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(todo_from_row).transpose().map_err(db_err)
    }

    async fn list_todos(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query(
            "SELECT id, subject, description, start_time, end_time, done, reminder FROM todos \
             ORDER BY done ASC, subject ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(todo_from_row).collect::<sqlx::Result<_>>().map_err(db_err)
    }

    async fn mark_done(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE todos SET done = 1 WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_todo(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_timeblock(&self, timeblock: Timeblock) -> Result<()> {
        timeblock.validate()?;
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("INSERT INTO timeblocks (id, name, starts_at, ends_at) VALUES (?, ?, ?, ?)")
            .bind(uuid_to_blob(timeblock.id))
            .bind(&timeblock.name)
            .bind(timeblock.start)
            .bind(timeblock.end)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        for todo_id in &timeblock.todo_ids {
            sqlx::query("INSERT OR IGNORE INTO timeblock_todos (timeblock_id, todo_id) VALUES (?, ?)")
                .bind(uuid_to_blob(timeblock.id))
                .bind(uuid_to_blob(*todo_id))
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn list_timeblocks(&self) -> Result<Vec<TimeblockPlan>> {
        let rows = sqlx::query("SELECT id, name, starts_at, ends_at FROM timeblocks ORDER BY starts_at, name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let mut plans = Vec::with_capacity(rows.len());
        for row in rows {
            let id = blob_to_uuid(&row.try_get::<Vec<u8>, _>("id").map_err(db_err)?);
            let todos = self.todos_in_block(id).await?;
            let timeblock = Timeblock {
                id,
                name: row.try_get("name").map_err(db_err)?,
                start: row.try_get("starts_at").map_err(db_err)?,
                end: row.try_get("ends_at").map_err(db_err)?,
                todo_ids: todos.iter().map(|t| t.id).collect(),
            };
            plans.push(TimeblockPlan { timeblock, todos });
        }
        Ok(plans)
    }

    async fn record_selection(&self, selection: Selection) -> Result<()> {
        selection.validate()?;
        sqlx::query("INSERT INTO selections (id, selected, todo) VALUES (?, ?, ?)")
            .bind(uuid_to_blob(selection.id))
            .bind(selection.selected)
            .bind(selection.todo)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn latest_selection(&self) -> Result<Option<Selection>> {
        let row = sqlx::query("SELECT id, selected, todo FROM selections ORDER BY id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(Selection {
            id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id").map_err(db_err)?),
            selected: row.try_get("selected").map_err(db_err)?,
            todo: row.try_get("todo").map_err(db_err)?,
        }))
    }

    async fn record_history(&self, entry: History) -> Result<()> {
        entry.validate()?;
        sqlx::query("INSERT INTO history (id, todo, rank) VALUES (?, ?, ?)")
            .bind(uuid_to_blob(entry.id))
            .bind(entry.todo)
            .bind(entry.rank)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_history(&self) -> Result<Vec<History>> {
        let rows = sqlx::query("SELECT id, todo, rank FROM history ORDER BY rank ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(history_from_row).collect::<sqlx::Result<_>>().map_err(db_err)
    }
}
