//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "romshelf")]
#[command(about = "Import, audit and export Neo Geo ROM libraries", long_about = None)]
pub(crate) struct Cli {
    /// Repository holding one folder per console (defaults to the saved setting, then the current directory)
    #[arg(short, long, global = true)]
    pub repository: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// The console a command operates on.
#[derive(Args, Clone)]
pub(crate) struct ConsoleArg {
    /// Console name or alias (e.g., mvs, arcade, ngpc, pocket)
    pub console: String,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Move newly staged ROMs into the library and write the import manifests
    Import {
        #[command(flatten)]
        target: ConsoleArg,

        /// Take candidates from this folder instead of <console>/roms_import
        #[arg(long)]
        staging: Option<PathBuf>,

        /// Show what would happen without moving or writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-hash catalogued ROMs and compare titles with the plugin data
    Check {
        #[command(flatten)]
        target: ConsoleArg,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy catalogued ROMs into a folder tree described by an export plan
    Export {
        #[command(flatten)]
        target: ConsoleArg,

        /// Export plan (XML with nested <Folder> and <Game crc32 rom> elements)
        #[arg(long)]
        plan: PathBuf,

        /// Destination folder
        #[arg(long)]
        dest: PathBuf,
    },

    /// List supported consoles and where their folders resolve
    List,

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl Commands {
    /// True when the command prints machine-readable output on stdout.
    pub(crate) fn wants_json(&self) -> bool {
        matches!(
            self,
            Commands::Import { json: true, .. } | Commands::Check { json: true, .. }
        )
    }
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings file and the resolved repository
    Show,

    /// Print the settings file path
    Path,

    /// Save the default repository folder
    SetRepository {
        /// Folder holding one sub-folder per console
        path: PathBuf,
    },

    /// Forget the saved repository folder
    ClearRepository,
}
