//! Command-line entry point for godo.

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use godo::cli::Cli;
use godo::cmd::{self, Context};
use godo::config::{default_data_dir, Config, CONFIG_FILE_NAME};
use godo::db::SqliteStore;
use godo::editor::{EditSession, ExternalEditor};
use godo::error::Result;

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let Some(invocation) = cmd::prepare(&cli.args, &mut out)? else {
        return Ok(());
    };

    let data_dir = default_data_dir();
    let config_path = cli.config.unwrap_or_else(|| data_dir.join(CONFIG_FILE_NAME));
    let config = Config::load(&config_path)?;

    let db_path = cli.db.unwrap_or_else(|| config.database_path(&data_dir));
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::open(&db_path)?;

    let editor = ExternalEditor::from_command_line(&config.editor_command());
    let session = EditSession::new(config.session_path());
    let ctx = Context { store: &store, editor: &editor, session: &session };

    cmd::dispatch(&ctx, &invocation, &mut out)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        if e.is_fatal() {
            eprintln!("{e}");
            std::process::exit(1);
        }
        // Usage mistakes, unknown ids and cancelled edits are not failures.
        println!("{e}");
    }
}
