//! Launching the external editor and the temp-file round trip around it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::document::{self, EditFields};
use crate::error::{GodoError, Result};

/// Something that lets a human edit a file in place.
pub trait Editor {
    /// Block until editing of `path` is finished.
    fn open(&self, path: &Path) -> Result<()>;
}

/// An interactive editor process sharing the terminal.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    program: String,
    args: Vec<String>,
}

impl ExternalEditor {
    /// Build from a command line such as `nvim` or `code --wait`.
    pub fn from_command_line(command_line: &str) -> Self {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next().unwrap_or_else(|| crate::config::DEFAULT_EDITOR.to_string());
        ExternalEditor { program, args: words.collect() }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Editor for ExternalEditor {
    fn open(&self, path: &Path) -> Result<()> {
        debug!(
            program = %self.program,
            args = ?self.args,
            path = %path.display(),
            "launching editor"
        );
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        if !status.success() {
            return Err(GodoError::Editor { program: self.program.clone(), status });
        }
        Ok(())
    }
}

/// One edit of a todo through a temporary document.
#[derive(Debug, Clone)]
pub struct EditSession {
    path: PathBuf,
}

impl EditSession {
    pub fn new(path: PathBuf) -> Self {
        EditSession { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `fields` out, let `editor` change them, and parse the result.
    ///
    /// The temp file is removed afterwards whether or not parsing succeeded.
    pub fn run(&self, editor: &dyn Editor, fields: &EditFields) -> Result<EditFields> {
        fs::write(&self.path, document::encode(&fields.content, &fields.tags, fields.done))?;
        let edited = editor
            .open(&self.path)
            .and_then(|()| fs::read_to_string(&self.path).map_err(GodoError::from));
        self.cleanup();
        Ok(document::decode(&edited?)?)
    }

    fn cleanup(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "could not remove edit document");
        }
    }
}
