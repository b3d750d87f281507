use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use clap::Parser;
use clap::Subcommand;

use crate::console::events::ExportFormat;
use crate::console::models::StatusFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Profile name
    /// Profile section to read from the profile file. Default is 'default'.
    /// A missing profile falls back to the built-in defaults.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    /// Server URL, overriding the profile
    #[clap(short = 's', long)]
    server: Option<String>,

    /// Seconds between automatic refreshes (0 disables polling)
    #[clap(long = "poll-secs")]
    poll_secs: Option<u64>,

    /// Directory exports are written to
    #[clap(long = "export-dir")]
    export_dir: Option<PathBuf>,

    /// Log file used by the interactive console
    #[clap(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[clap(short = 'v', long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<ConsoleCommand>,
}

/// One-shot subcommands; without one the interactive console starts
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Print the scan list and exit
    List {
        /// Only show scans matching this filter
        #[arg(short, long, value_enum, default_value_t = StatusFilter::All)]
        filter: StatusFilter,
        /// Print raw JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Search scan results
    Search {
        /// Scan to search in
        #[arg(long)]
        id: Option<String>,
        /// Event type, e.g. INTERNET_NAME
        #[arg(long = "event-type")]
        event_type: Option<String>,
        /// Value to look for; `*` is a wildcard, `/.../` a regex
        #[arg(long)]
        value: Option<String>,
    },
    /// Download an export of one or more scans
    Export {
        #[arg(short, long, value_enum)]
        format: ExportFormat,
        /// Comma-separated scan ids
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,
        /// Directory to write into, overriding --export-dir
        #[arg(short, long = "output-dir")]
        output_dir: Option<PathBuf>,
    },
    /// Show or change the colour theme
    Theme {
        #[arg(value_enum, default_value_t = ThemeChange::Show)]
        change: ThemeChange,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChange {
    Show,
    Toggle,
    Light,
    Dark,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    profile: String,
    server: Option<String>,
    poll_secs: Option<u64>,
    export_dir: Option<PathBuf>,
    log_file: Option<PathBuf>,
    verbose: bool,
    command: Option<ConsoleCommand>,
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            profile: args.profile,
            server: args.server,
            poll_secs: args.poll_secs,
            export_dir: args.export_dir,
            log_file: args.log_file,
            verbose: args.verbose,
            command: args.command,
        }
    }
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::parse_from(itr).into()
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    pub fn poll_secs(&self) -> Option<u64> {
        self.poll_secs
    }

    pub fn export_dir(&self) -> Option<&Path> {
        self.export_dir.as_deref()
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn command(&self) -> Option<&ConsoleCommand> {
        self.command.as_ref()
    }
}
