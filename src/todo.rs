//! Todo record and the small value types passed to the store.

use chrono::{DateTime, Local};

use crate::document::format_checkbox;

/// `time.Stamp`-style creation timestamp, e.g. `Jan  2 15:04:05`.
pub const CREATED_AT_FORMAT: &str = "%b %e %H:%M:%S";

/// Longest first line shown in a list row before it is cut.
const ROW_CONTENT_WIDTH: usize = 80;

/// A stored todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub created_at: String,
    pub content: String,
    pub done: bool,
    pub tags: String,
}

/// Fields for a todo that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub created_at: String,
    pub content: String,
    pub done: bool,
    pub tags: String,
}

impl NewTodo {
    pub fn new(content: String, tags: String, done: bool, now: DateTime<Local>) -> Self {
        NewTodo {
            created_at: now.format(CREATED_AT_FORMAT).to_string(),
            content,
            done,
            tags,
        }
    }
}

/// Partial update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoUpdate {
    pub content: Option<String>,
    pub tags: Option<String>,
    pub done: Option<bool>,
}

impl TodoUpdate {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.tags.is_none() && self.done.is_none()
    }
}

/// Row selection for listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub done: Option<bool>,
    /// Substring the tags column must contain.
    pub tags_like: Option<String>,
}

/// Join tag words the way they are stored.
pub fn join_tags(words: &[String]) -> String {
    words.join(", ")
}

/// Format tags for display, `-` when there are none.
pub fn format_tags(tags: &str) -> &str {
    if tags.is_empty() {
        "-"
    } else {
        tags
    }
}

/// Width of the widest id, for aligning the id column.
pub fn max_id_width(todos: &[Todo]) -> usize {
    todos
        .iter()
        .map(|t| t.id)
        .max()
        .unwrap_or(0)
        .to_string()
        .len()
}

impl Todo {
    /// One list row: id, optional creation time, checkbox, first line, tags.
    pub fn row_string(&self, show_created: bool, id_width: usize) -> String {
        let first_line = self.content.lines().next().unwrap_or_default();
        let first_line = truncate(first_line, ROW_CONTENT_WIDTH);
        let padding = " ".repeat(id_width.saturating_sub(self.id.to_string().len()));
        let checkbox = format_checkbox(self.done);
        let tags = format_tags(&self.tags);

        if show_created {
            format!(
                "{} {} {}  {}  {}   |   {}",
                self.id, padding, self.created_at, checkbox, first_line, tags
            )
        } else {
            format!("{} {} {}  {}   |   {}", self.id, padding, checkbox, first_line, tags)
        }
    }
}

/// Cut a line to `width` characters, marking the cut with `...`.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width).collect();
        out.push_str("...");
        out
    }
}
