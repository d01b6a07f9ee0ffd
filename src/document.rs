//! The plain-text document handed to the external editor.
//!
//! Line 0 is a one-line header carrying the structured fields, every line
//! after it is the todo content verbatim:
//!
//! ```text
//! DONE:[ ];TAGS:urgent, home
//! buy milk
//! call mom
//! ```
//!
//! A missing `TAGS:` segment decodes as "no tags". A checkbox that is not one
//! of `[X]`, `[x]`, `[ ]` or `[]` is rejected outright instead of guessed.

use thiserror::Error;

const DONE_KEY: &str = "DONE";
const TAGS_KEY: &str = "TAGS";

/// Errors produced when decoding an edited document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("syntax error, no checkbox found (got {found:?})")]
    MissingCheckbox { found: String },
}

/// The editable fields of a todo as carried by the document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditFields {
    pub content: String,
    pub tags: String,
    pub done: bool,
}

impl EditFields {
    pub fn new(content: impl Into<String>, tags: impl Into<String>, done: bool) -> Self {
        EditFields { content: content.into(), tags: tags.into(), done }
    }
}

/// Render the checkbox token for a done flag.
pub fn format_checkbox(done: bool) -> &'static str {
    if done {
        "[X]"
    } else {
        "[ ]"
    }
}

/// Translate a checkbox token back into a done flag.
pub fn parse_checkbox(token: &str) -> Result<bool, DocumentError> {
    match token {
        "[X]" | "[x]" => Ok(true),
        "[ ]" | "[]" => Ok(false),
        other => Err(DocumentError::MissingCheckbox { found: other.to_string() }),
    }
}

/// Build the document text for a todo.
pub fn encode(content: &str, tags: &str, done: bool) -> String {
    format!(
        "{DONE_KEY}:{};{TAGS_KEY}:{tags}\n{content}",
        format_checkbox(done)
    )
}

/// Parse an edited document back into its fields.
///
/// Content is everything after the header line, rejoined with `\n`; a
/// document with no body decodes to empty content, which callers treat as a
/// cancelled edit.
pub fn decode(text: &str) -> Result<EditFields, DocumentError> {
    let (header, content) = match text.split_once('\n') {
        Some((header, body)) => (header, body),
        None => (text, ""),
    };

    let mut segments = header.splitn(2, ';');
    let status = segments.next().unwrap_or_default();
    let checkbox = status
        .splitn(2, ':')
        .nth(1)
        .map(str::trim)
        .ok_or_else(|| DocumentError::MissingCheckbox { found: status.trim().to_string() })?;
    let done = parse_checkbox(checkbox)?;

    let tags = segments
        .next()
        .and_then(|segment| segment.splitn(2, ':').nth(1))
        .map(|tags| tags.trim().to_string())
        .unwrap_or_default();

    Ok(EditFields { content: content.to_string(), tags, done })
}
