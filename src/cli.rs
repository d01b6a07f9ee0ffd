use std::path::PathBuf;

use clap::Parser;

/// Usage text printed for `help`, `--help` and unrecognized input.
pub const USAGE: &str = "\
godo is a simple TODO-tool
Usage:
    new n <contents>  add new TODO row to database
    edit e <id>       edit existing TODO
    list l            list all existing TODOs
    done x <id...>    mark TODOs as done
    delete d <id...>  delete existing TODOs
    view v <id>       view single TODO
    help h            show this text
    --tag -t <tags>   add tags (new) or filter by tags (list)
    --created -c      show creation time (list)
    --edit -e         open the new TODO in an editor (new)
";

/// Process-level flags. Everything after them is handed to the command
/// classifier untouched.
#[derive(Parser, Debug)]
#[command(name = "godo", version, about = "Simple TODO-tool", disable_help_flag = true)]
pub struct Cli {
    /// Path to the SQLite database file.
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Path to the JSON config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(long)]
    pub verbose: bool,

    /// Command and its arguments, e.g. `new buy milk --tag home`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
