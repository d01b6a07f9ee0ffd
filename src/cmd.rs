//! Command handlers.
//!
//! Each handler takes the resolved [`Invocation`] plus the collaborators it
//! needs and writes its user-facing output to `out`. Recoverable problems
//! (bad usage, unknown ids, a cancelled edit) come back as non-fatal
//! [`GodoError`]s for `main` to report.

use std::io::Write;

use chrono::Local;
use tracing::debug;

use crate::args::{classify, partition, Command, Invocation, Opt};
use crate::cli::USAGE;
use crate::db::TodoStore;
use crate::document::EditFields;
use crate::editor::{EditSession, Editor};
use crate::error::{GodoError, Result};
use crate::todo::{join_tags, max_id_width, NewTodo, TodoFilter, TodoUpdate};

/// Collaborators shared by all handlers.
pub struct Context<'a> {
    pub store: &'a dyn TodoStore,
    pub editor: &'a dyn Editor,
    pub session: &'a EditSession,
}

/// Turn the raw tokens into an invocation.
///
/// Prints the usage text and returns `None` when there is nothing to run:
/// no tokens at all, or none that is a known command or option.
pub fn prepare(tokens: &[String], out: &mut dyn Write) -> Result<Option<Invocation>> {
    if tokens.is_empty() {
        write!(out, "{USAGE}")?;
        return Ok(None);
    }

    let commands = classify(tokens);
    if commands.is_empty() {
        writeln!(out, "Did not receive any valid arguments")?;
        write!(out, "{USAGE}")?;
        return Ok(None);
    }
    debug!(?commands, "classified arguments");

    Invocation::resolve(partition(tokens)).map(Some)
}

/// Run the handler for `inv.command`.
pub fn dispatch(ctx: &Context<'_>, inv: &Invocation, out: &mut dyn Write) -> Result<()> {
    debug!(command = ?inv.command, args = ?inv.args, "dispatching");
    match inv.command {
        Command::New => cmd_new(ctx, inv, out),
        Command::List => cmd_list(ctx, inv, out),
        Command::Done => cmd_done(ctx, inv, out),
        Command::Edit => cmd_edit(ctx, inv, out),
        Command::Delete => cmd_delete(ctx, inv, out),
        Command::View => cmd_view(ctx, inv, out),
        Command::Help => cmd_help(out),
    }
}

/// Parse every argument as a todo id.
fn parse_ids(args: &[String], missing: &str) -> Result<Vec<i64>> {
    if args.is_empty() {
        return Err(GodoError::Usage(missing.to_string()));
    }
    args.iter()
        .map(|raw| {
            raw.parse::<i64>()
                .map_err(|_| GodoError::Usage(format!("Not a valid id: {raw}")))
        })
        .collect()
}

fn ensure_exist(ctx: &Context<'_>, ids: &[i64]) -> Result<()> {
    if ctx.store.all_exist(ids)? {
        Ok(())
    } else {
        let ids: Vec<String> = ids.iter().map(i64::to_string).collect();
        Err(GodoError::NotFound(ids.join(", ")))
    }
}

/// Blank content after an edit means the user backed out.
fn ensure_content(fields: &EditFields) -> Result<()> {
    if fields.content.trim().is_empty() {
        Err(GodoError::EmptyContent)
    } else {
        Ok(())
    }
}

/// Add a todo from the command line, optionally refined in the editor.
pub fn cmd_new(ctx: &Context<'_>, inv: &Invocation, out: &mut dyn Write) -> Result<()> {
    let edit = inv.has(Opt::Edit);
    if inv.args.is_empty() && !edit {
        return Err(GodoError::Usage("Missing content for the new todo".into()));
    }

    let tags = join_tags(inv.option_args(Opt::Tag).unwrap_or_default());
    let mut fields = EditFields::new(inv.args.join(" "), tags, false);
    if edit {
        fields = ctx.session.run(ctx.editor, &fields)?;
    }
    ensure_content(&fields)?;

    let id = ctx
        .store
        .create(&NewTodo::new(fields.content, fields.tags, fields.done, Local::now()))?;
    writeln!(out, "Added todo {id}")?;
    Ok(())
}

/// Print open todos, then a blank line, then finished ones.
pub fn cmd_list(ctx: &Context<'_>, inv: &Invocation, out: &mut dyn Write) -> Result<()> {
    let tags_like = inv.option_args(Opt::Tag).map(join_tags);
    let undone = ctx
        .store
        .find_where(&TodoFilter { done: Some(false), tags_like: tags_like.clone() })?;
    let done = ctx.store.find_where(&TodoFilter { done: Some(true), tags_like })?;

    if undone.is_empty() && done.is_empty() {
        writeln!(out, "No todos found")?;
        return Ok(());
    }

    let show_created = inv.has(Opt::Created);
    let width = max_id_width(&undone).max(max_id_width(&done));

    for todo in &undone {
        writeln!(out, "{}", todo.row_string(show_created, width))?;
    }
    if !undone.is_empty() {
        writeln!(out)?;
    }
    for todo in &done {
        writeln!(out, "{}", todo.row_string(show_created, width))?;
    }
    Ok(())
}

/// Mark one or more todos done.
pub fn cmd_done(ctx: &Context<'_>, inv: &Invocation, out: &mut dyn Write) -> Result<()> {
    let ids = parse_ids(&inv.args, "Missing id of the todo to mark done")?;
    ensure_exist(ctx, &ids)?;
    let update = TodoUpdate { done: Some(true), ..Default::default() };
    for &id in &ids {
        ctx.store.update_fields(id, &update)?;
    }
    writeln!(out, "Marked {} todo(s) done", ids.len())?;
    Ok(())
}

/// Edit a stored todo in the external editor.
pub fn cmd_edit(ctx: &Context<'_>, inv: &Invocation, out: &mut dyn Write) -> Result<()> {
    let ids = parse_ids(&inv.args, "Missing id of the todo to edit")?;
    ensure_exist(ctx, &ids)?;
    let id = ids[0];
    let todo = ctx
        .store
        .find_by_id(id)?
        .ok_or_else(|| GodoError::NotFound(id.to_string()))?;

    let edited = ctx
        .session
        .run(ctx.editor, &EditFields::new(todo.content, todo.tags, todo.done))?;
    ensure_content(&edited)?;

    ctx.store.update_fields(
        id,
        &TodoUpdate {
            content: Some(edited.content),
            tags: Some(edited.tags),
            done: Some(edited.done),
        },
    )?;
    writeln!(out, "Updated todo {id}")?;
    Ok(())
}

/// Delete one or more todos.
pub fn cmd_delete(ctx: &Context<'_>, inv: &Invocation, out: &mut dyn Write) -> Result<()> {
    let ids = parse_ids(&inv.args, "Missing id of the todo to remove")?;
    ensure_exist(ctx, &ids)?;
    let removed = ctx.store.delete(&ids)?;
    writeln!(out, "Deleted {removed} todo(s)")?;
    Ok(())
}

/// Print the tags and full content of a todo.
pub fn cmd_view(ctx: &Context<'_>, inv: &Invocation, out: &mut dyn Write) -> Result<()> {
    let ids = parse_ids(&inv.args, "Missing id of the todo to view")?;
    ensure_exist(ctx, &ids)?;
    let id = ids[0];
    let todo = ctx
        .store
        .find_by_id(id)?
        .ok_or_else(|| GodoError::NotFound(id.to_string()))?;
    writeln!(out, "TAGS: {}\n{}", todo.tags, todo.content)?;
    Ok(())
}

pub fn cmd_help(out: &mut dyn Write) -> Result<()> {
    write!(out, "{USAGE}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use crate::editor::tests::ScriptedEditor;
    use crate::todo::Todo;

    struct Harness {
        _dir: tempfile::TempDir,
        store: SqliteStore,
        session: EditSession,
    }

    impl Harness {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let session = EditSession::new(dir.path().join("godofile.txt"));
            Harness { _dir: dir, store: SqliteStore::open_in_memory().unwrap(), session }
        }

        fn run_with(&self, editor: &dyn Editor, tokens: &[&str]) -> (Result<()>, String) {
            let tokens: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
            let inv = Invocation::resolve(partition(&tokens)).unwrap();
            let ctx = Context { store: &self.store, editor, session: &self.session };
            let mut out = Vec::new();
            let result = dispatch(&ctx, &inv, &mut out);
            (result, String::from_utf8(out).unwrap())
        }

        fn run(&self, tokens: &[&str]) -> (Result<()>, String) {
            self.run_with(&ScriptedEditor::unchanged(), tokens)
        }

        fn all(&self) -> Vec<Todo> {
            self.store.find_where(&TodoFilter::default()).unwrap()
        }
    }

    #[test]
    fn test_new_joins_words_and_tags() {
        let h = Harness::new();
        let (result, out) = h.run(&["new", "buy", "milk", "--tag", "urgent", "home"]);
        result.unwrap();
        assert_eq!(out, "Added todo 1\n");
        let todos = h.all();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].content, "buy milk");
        assert_eq!(todos[0].tags, "urgent, home");
        assert!(!todos[0].done);
        assert!(!todos[0].created_at.is_empty());
    }

    #[test]
    fn test_new_without_content_is_usage_error() {
        let h = Harness::new();
        let (result, _) = h.run(&["n", "-t", "home"]);
        assert!(matches!(result, Err(GodoError::Usage(_))));
        assert!(h.all().is_empty());
    }

    #[test]
    fn test_new_with_edit_uses_document() {
        let h = Harness::new();
        let editor = ScriptedEditor::writing("DONE:[X];TAGS:garden\nwater plants\nand trees");
        let (result, _) = h.run_with(&editor, &["n", "water", "-t", "home", "-e"]);
        result.unwrap();
        assert_eq!(editor.seen.borrow()[0], "DONE:[ ];TAGS:home\nwater");
        let todo = &h.all()[0];
        assert_eq!(todo.content, "water plants\nand trees");
        assert_eq!(todo.tags, "garden");
        assert!(todo.done);
    }

    #[test]
    fn test_new_with_edit_and_empty_body_is_not_stored() {
        let h = Harness::new();
        let editor = ScriptedEditor::writing("DONE:[ ];TAGS:\n\n");
        let (result, _) = h.run_with(&editor, &["new", "-e"]);
        assert!(matches!(result, Err(GodoError::EmptyContent)));
        assert!(h.all().is_empty());
    }

    #[test]
    fn test_list_orders_open_before_done() {
        let h = Harness::new();
        h.run(&["new", "first"]).0.unwrap();
        h.run(&["new", "second", "-t", "work"]).0.unwrap();
        h.run(&["done", "1"]).0.unwrap();

        let (result, out) = h.run(&["list"]);
        result.unwrap();
        assert_eq!(out, "2  [ ]  second   |   work\n\n1  [X]  first   |   -\n");
    }

    #[test]
    fn test_list_filters_by_tag_and_shows_created() {
        let h = Harness::new();
        h.run(&["new", "a", "-t", "home"]).0.unwrap();
        h.run(&["new", "b", "-t", "work"]).0.unwrap();

        let (_, out) = h.run(&["l", "-t", "home"]);
        assert!(out.contains("a   |   home"));
        assert!(!out.contains("work"));

        let created = h.all()[0].created_at.clone();
        let (_, out) = h.run(&["l", "-c"]);
        assert!(out.contains(&created));
    }

    #[test]
    fn test_list_empty() {
        let h = Harness::new();
        let (result, out) = h.run(&["list"]);
        result.unwrap();
        assert_eq!(out, "No todos found\n");
    }

    #[test]
    fn test_done_requires_existing_ids() {
        let h = Harness::new();
        h.run(&["new", "a"]).0.unwrap();
        let (result, _) = h.run(&["x", "1", "9"]);
        assert!(matches!(result, Err(GodoError::NotFound(_))));
        assert!(!h.all()[0].done);

        let (result, _) = h.run(&["x", "one"]);
        assert!(matches!(result, Err(GodoError::Usage(_))));

        let (result, _) = h.run(&["x"]);
        assert!(matches!(result, Err(GodoError::Usage(_))));
    }

    #[test]
    fn test_edit_updates_all_fields() {
        let h = Harness::new();
        h.run(&["new", "draft", "-t", "work"]).0.unwrap();
        let editor = ScriptedEditor::writing("DONE:[x];TAGS:work, done\nfinal text");
        let (result, out) = h.run_with(&editor, &["edit", "1"]);
        result.unwrap();
        assert_eq!(out, "Updated todo 1\n");
        assert_eq!(editor.seen.borrow()[0], "DONE:[ ];TAGS:work\ndraft");
        let todo = &h.all()[0];
        assert_eq!(todo.content, "final text");
        assert_eq!(todo.tags, "work, done");
        assert!(todo.done);
    }

    #[test]
    fn test_edit_to_empty_keeps_previous_state() {
        let h = Harness::new();
        h.run(&["new", "keep", "me"]).0.unwrap();
        let editor = ScriptedEditor::writing("DONE:[X];TAGS:gone");
        let (result, _) = h.run_with(&editor, &["e", "1"]);
        assert!(matches!(result, Err(GodoError::EmptyContent)));
        let todo = &h.all()[0];
        assert_eq!(todo.content, "keep me");
        assert!(!todo.done);
    }

    #[test]
    fn test_edit_corrupted_document_is_fatal_and_keeps_state() {
        let h = Harness::new();
        h.run(&["new", "keep"]).0.unwrap();
        let editor = ScriptedEditor::writing("DONE:[?];TAGS:\nchanged");
        let (result, _) = h.run_with(&editor, &["edit", "1"]);
        let err = result.unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(h.all()[0].content, "keep");
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prepare_without_tokens_prints_usage() {
        let mut out = Vec::new();
        assert!(prepare(&[], &mut out).unwrap().is_none());
        assert_eq!(String::from_utf8(out).unwrap(), USAGE);
    }

    #[test]
    fn test_prepare_unrecognized_tokens() {
        let mut out = Vec::new();
        assert!(prepare(&tokens(&["buy", "milk"]), &mut out).unwrap().is_none());
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, format!("Did not receive any valid arguments\n{USAGE}"));
    }

    #[test]
    fn test_prepare_resolves_invocation() {
        let mut out = Vec::new();
        let inv = prepare(&tokens(&["new", "milk", "-t", "home"]), &mut out).unwrap().unwrap();
        assert_eq!(inv.command, Command::New);
        assert!(out.is_empty());

        let err = prepare(&tokens(&["-c"]), &mut out).unwrap_err();
        assert!(matches!(err, GodoError::Usage(_)));
    }

    #[test]
    fn test_edit_and_view_check_every_id() {
        let h = Harness::new();
        h.run(&["new", "keep"]).0.unwrap();
        let editor = ScriptedEditor::writing("DONE:[X];TAGS:\nchanged");
        let (result, _) = h.run_with(&editor, &["edit", "1", "99"]);
        assert!(matches!(result, Err(GodoError::NotFound(_))));
        assert!(editor.seen.borrow().is_empty());
        assert_eq!(h.all()[0].content, "keep");

        let (result, out) = h.run(&["view", "1", "99"]);
        assert!(matches!(result, Err(GodoError::NotFound(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_view_with_help_option_prints_usage() {
        let h = Harness::new();
        h.run(&["new", "x"]).0.unwrap();
        let (result, out) = h.run(&["view", "1", "-h"]);
        result.unwrap();
        assert_eq!(out, USAGE);
    }

    #[test]
    fn test_edit_unknown_id() {
        let h = Harness::new();
        let (result, _) = h.run(&["edit", "4"]);
        assert!(matches!(result, Err(GodoError::NotFound(_))));
    }

    #[test]
    fn test_delete_many() {
        let h = Harness::new();
        for word in ["a", "b", "c"] {
            h.run(&["new", word]).0.unwrap();
        }
        let (result, out) = h.run(&["d", "1", "3"]);
        result.unwrap();
        assert_eq!(out, "Deleted 2 todo(s)\n");
        assert_eq!(h.all().iter().map(|t| t.id).collect::<Vec<_>>(), [2]);

        let (result, _) = h.run(&["delete", "2", "7"]);
        assert!(matches!(result, Err(GodoError::NotFound(_))));
        assert_eq!(h.all().len(), 1);
    }

    #[test]
    fn test_view() {
        let h = Harness::new();
        h.run(&["new", "read", "book", "-t", "fun"]).0.unwrap();
        let (result, out) = h.run(&["view", "1"]);
        result.unwrap();
        assert_eq!(out, "TAGS: fun\nread book\n");

        let (result, _) = h.run(&["v"]);
        assert!(matches!(result, Err(GodoError::Usage(_))));
    }

    #[test]
    fn test_help() {
        let h = Harness::new();
        let (result, out) = h.run(&["--help"]);
        result.unwrap();
        assert_eq!(out, USAGE);
    }
}
