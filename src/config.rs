//! User configuration.
//!
//! Everything is optional. Values come from, in order of precedence, the
//! command line, `~/.TODO/config.json`, the environment, and built-in
//! defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

/// Directory under `$HOME` holding the database and config file.
pub const DATA_DIR_NAME: &str = ".TODO";
pub const DATABASE_FILE_NAME: &str = "todos.db";
pub const CONFIG_FILE_NAME: &str = "config.json";
/// Name of the temporary document handed to the editor.
pub const SESSION_FILE_NAME: &str = "godofile.txt";
pub const DEFAULT_EDITOR: &str = "nvim";

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor command line, e.g. `"code --wait"`.
    pub editor: Option<String>,
    /// Database file path.
    pub database: Option<PathBuf>,
    /// Path of the temporary edit document.
    pub session_file: Option<PathBuf>,
}

impl Config {
    /// Load config from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Editor command from config, `$VISUAL`, `$EDITOR`, then the default.
    pub fn editor_command(&self) -> String {
        resolve_editor(
            self.editor.as_deref(),
            std::env::var("VISUAL").ok().as_deref(),
            std::env::var("EDITOR").ok().as_deref(),
        )
    }

    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| data_dir.join(DATABASE_FILE_NAME))
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(SESSION_FILE_NAME))
    }
}

/// First non-blank candidate wins.
pub fn resolve_editor(
    configured: Option<&str>,
    visual: Option<&str>,
    editor: Option<&str>,
) -> String {
    [configured, visual, editor]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_EDITOR)
        .to_string()
}

/// `~/.TODO`, falling back to `./.TODO` when `$HOME` is unset.
pub fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(DATA_DIR_NAME)
}
