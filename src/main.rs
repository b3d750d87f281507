//! # scanline Entry Point
//!
//! Without a subcommand the interactive console takes over the terminal.
//! Subcommands run once and print to stdout.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use scanline::cmd_args::{CommandLineArgs, ConsoleCommand, ThemeChange};
use scanline::config::{self, ConsoleProfile};
use scanline::console::io::{TerminalEventStream, TerminalRenderStream};
use scanline::console::report::format_scan_table;
use scanline::{ApiClient, AppController, SearchQuery, Theme, ThemeStore};
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

const QUIET_TARGETS: [&str; 6] = ["reqwest", "hyper", "hyper_util", "rustls", "tokio", "h2"];

fn env_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    let mut filter = EnvFilter::try_from_env(config::LOG_LEVEL_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    for target in QUIET_TARGETS {
        if let Ok(directive) = format!("{target}=warn").parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Log to a file; the console owns the terminal while it runs
fn init_file_tracing(verbose: bool, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
    Ok(())
}

fn init_stderr_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd_args = CommandLineArgs::parse();
    let theme_store = ThemeStore::new(config::expand_path(&config::get_prefs_path()));

    let Some(command) = cmd_args.command().cloned() else {
        let log_path = cmd_args
            .log_file()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config::expand_path(config::DEFAULT_LOG_PATH));
        init_file_tracing(cmd_args.verbose(), &log_path)?;

        let profile = config::resolve_profile(&cmd_args)?;
        let mut app = AppController::with_io_streams(
            profile,
            theme_store,
            TerminalEventStream::new(),
            TerminalRenderStream::new(),
        )?;
        return app.run().await;
    };

    init_stderr_tracing(cmd_args.verbose());
    let profile = config::resolve_profile(&cmd_args)?;
    run_once(command, &profile, &theme_store).await
}

async fn run_once(
    command: ConsoleCommand,
    profile: &ConsoleProfile,
    theme_store: &ThemeStore,
) -> Result<()> {
    match command {
        ConsoleCommand::List { filter, json } => {
            let client = ApiClient::new(profile)?;
            let scans = client.scan_list().await?;
            if json {
                let visible: Vec<_> = filter.apply(&scans);
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                let color = atty::is(atty::Stream::Stdout);
                print!("{}", format_scan_table(&scans, filter, color));
            }
        }
        ConsoleCommand::Search {
            id,
            event_type,
            value,
        } => {
            let client = ApiClient::new(profile)?;
            let query = SearchQuery {
                scan_id: id,
                event_type,
                value,
            };
            let results = client.search(&query).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        ConsoleCommand::Export {
            format,
            ids,
            output_dir,
        } => {
            let client = ApiClient::new(profile)?;
            let dir = output_dir.unwrap_or_else(|| profile.export_dir());
            let path = client.download_export(format, &ids, &dir).await?;
            println!("{}", path.display());
        }
        ConsoleCommand::Theme { change } => {
            let theme = match change {
                ThemeChange::Show => theme_store.load(),
                ThemeChange::Toggle => theme_store.toggle()?,
                ThemeChange::Light => {
                    theme_store.save(Theme::Light)?;
                    Theme::Light
                }
                ThemeChange::Dark => {
                    theme_store.save(Theme::Dark)?;
                    Theme::Dark
                }
            };
            println!("{theme}");
        }
    }
    Ok(())
}
