//! romshelf CLI
//!
//! Command-line interface for importing staged ROM dumps into a console
//! library, auditing its catalog, and exporting curated copies.

mod cli_types;
mod commands;
mod error;
mod logging;
mod progress;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
use commands::check::run_check;
use commands::config::{
    run_config_clear_repository, run_config_path, run_config_set_repository, run_config_show,
};
use commands::export::run_export;
use commands::import::run_import;
use commands::list::run_list;
use error::CliError;

fn main() {
    let cli = Cli::parse();

    // JSON goes to stdout, so keep info lines out of it
    let quiet = cli.quiet || cli.command.wants_json();
    if let Err(e) = logging::init(quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to set up logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli, quiet) {
        log::error!("{}", e);
        log::logger().flush();
        std::process::exit(1);
    }
    log::logger().flush();
}

fn run(cli: Cli, quiet: bool) -> Result<(), CliError> {
    let repository = cli.repository;
    match cli.command {
        Commands::Import {
            target,
            staging,
            dry_run,
            json,
        } => {
            let config = commands::console_config(repository, &target.console)?;
            run_import(config, staging, dry_run, json, quiet)
        }
        Commands::Check { target, json } => {
            let config = commands::console_config(repository, &target.console)?;
            run_check(config, json, quiet)
        }
        Commands::Export { target, plan, dest } => {
            let config = commands::console_config(repository, &target.console)?;
            run_export(config, plan, dest, quiet)
        }
        Commands::List => run_list(repository),
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(repository),
            ConfigAction::Path => {
                run_config_path();
                Ok(())
            }
            ConfigAction::SetRepository { path } => run_config_set_repository(path),
            ConfigAction::ClearRepository => run_config_clear_repository(),
        },
    }
}
