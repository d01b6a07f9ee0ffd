//! Storage for todos.
//!
//! `TodoStore` is what the command handlers talk to; `SqliteStore` is the one
//! implementation, a single `todos` table in a local SQLite file. Opening a
//! store migrates it: the table is created if missing and any column a newer
//! build expects is added in place.

use std::path::Path;

use rusqlite::{params_from_iter, types::Value, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::Result;
use crate::todo::{NewTodo, Todo, TodoFilter, TodoUpdate};

/// Columns of the `todos` table and the definition used to add each one.
const COLUMNS: &[(&str, &str)] = &[
    ("created_at", "TEXT NOT NULL DEFAULT ''"),
    ("content", "TEXT NOT NULL DEFAULT ''"),
    ("done", "INTEGER NOT NULL DEFAULT 0"),
    ("tags", "TEXT NOT NULL DEFAULT ''"),
];

/// Storage operations needed by the command handlers.
pub trait TodoStore {
    /// Insert a todo and return its assigned id.
    fn create(&self, todo: &NewTodo) -> Result<i64>;

    /// Get a todo by id.
    fn find_by_id(&self, id: i64) -> Result<Option<Todo>>;

    /// Overwrite the fields set in `update`.
    fn update_fields(&self, id: i64, update: &TodoUpdate) -> Result<()>;

    /// Delete todos by id, returning how many rows went away.
    fn delete(&self, ids: &[i64]) -> Result<usize>;

    /// All todos matching `filter`, ordered by id.
    fn find_where(&self, filter: &TodoFilter) -> Result<Vec<Todo>>;

    /// True when every id in `ids` exists.
    fn all_exist(&self, ids: &[i64]) -> Result<bool> {
        for &id in ids {
            if self.find_by_id(id)?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// `TodoStore` backed by SQLite.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening todo database");
        Self::from_connection(Connection::open(path)?)
    }

    /// Fresh in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = SqliteStore { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Make sure the table and all expected columns exist.
    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS todos (id INTEGER PRIMARY KEY AUTOINCREMENT)",
        )?;

        let existing: Vec<String> = {
            let mut stmt = self.conn.prepare("PRAGMA table_info(todos)")?;
            let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
            names.collect::<rusqlite::Result<_>>()?
        };

        for (name, definition) in COLUMNS {
            if !existing.iter().any(|c| c.eq_ignore_ascii_case(name)) {
                debug!(column = name, "adding missing column");
                self.conn
                    .execute(&format!("ALTER TABLE todos ADD COLUMN {name} {definition}"), [])?;
            }
        }
        Ok(())
    }
}

fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get("id")?,
        created_at: row.get("created_at")?,
        content: row.get("content")?,
        done: row.get("done")?,
        tags: row.get("tags")?,
    })
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

impl TodoStore for SqliteStore {
    fn create(&self, todo: &NewTodo) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO todos (created_at, content, done, tags) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![todo.created_at, todo.content, todo.done, todo.tags],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, "created todo");
        Ok(id)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Todo>> {
        let todo = self
            .conn
            .query_row(
                "SELECT id, created_at, content, done, tags FROM todos WHERE id = ?1",
                [id],
                todo_from_row,
            )
            .optional()?;
        Ok(todo)
    }

    fn update_fields(&self, id: i64, update: &TodoUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut sets = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(content) = &update.content {
            sets.push("content = ?");
            values.push(Value::Text(content.clone()));
        }
        if let Some(tags) = &update.tags {
            sets.push("tags = ?");
            values.push(Value::Text(tags.clone()));
        }
        if let Some(done) = update.done {
            sets.push("done = ?");
            values.push(Value::Integer(i64::from(done)));
        }
        values.push(Value::Integer(id));

        let sql = format!("UPDATE todos SET {} WHERE id = ?", sets.join(", "));
        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        debug!(id, changed, "updated todo");
        Ok(())
    }

    fn delete(&self, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!("DELETE FROM todos WHERE id IN ({})", placeholders(ids.len()));
        let removed = self.conn.execute(&sql, params_from_iter(ids.iter()))?;
        debug!(?ids, removed, "deleted todos");
        Ok(removed)
    }

    fn find_where(&self, filter: &TodoFilter) -> Result<Vec<Todo>> {
        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(done) = filter.done {
            clauses.push("done = ?");
            values.push(Value::Integer(i64::from(done)));
        }
        if let Some(tags) = &filter.tags_like {
            clauses.push("tags LIKE ?");
            values.push(Value::Text(format!("%{tags}%")));
        }

        let mut sql = String::from("SELECT id, created_at, content, done, tags FROM todos");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), todo_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
