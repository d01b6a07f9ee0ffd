//! # godo - a simple TODO-tool
//!
//! Short todos kept in a local SQLite file, with long-form editing done in
//! your own editor.
//!
//! ```bash
//! godo new buy milk --tag home      # add a todo
//! godo new --edit                   # write it in $EDITOR instead
//! godo list --tag home --created    # open todos first, then done ones
//! godo done 3 4                     # mark done
//! godo edit 3                       # edit content, tags and status
//! godo view 3
//! godo delete 3 4
//! ```
//!
//! Editing goes through a small document whose first line carries the status
//! and tags:
//!
//! ```text
//! DONE:[ ];TAGS:urgent, home
//! buy milk
//! call mom
//! ```
//!
//! Data lives in `~/.TODO/todos.db`. An optional `~/.TODO/config.json` can set
//! `editor`, `database` and `session_file`.

pub mod args;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod document;
pub mod editor;
pub mod error;
pub mod todo;
