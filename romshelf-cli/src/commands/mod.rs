pub(crate) mod check;
pub(crate) mod config;
pub(crate) mod export;
pub(crate) mod import;
pub(crate) mod list;

use std::path::PathBuf;

use serde::Serialize;

use romshelf_core::{Console, ConsoleConfig};
use romshelf_lib::Settings;
use romshelf_lib::settings::settings_path;

use crate::error::CliError;

/// Read the settings file, naming it in the error.
pub(crate) fn load_settings() -> Result<Settings, CliError> {
    Settings::load()
        .map_err(|e| CliError::config(format!("{}: {}", settings_path().display(), e)))
}

/// Resolve a console name to its run configuration inside the repository.
pub(crate) fn console_config(
    repository: Option<PathBuf>,
    name: &str,
) -> Result<ConsoleConfig, CliError> {
    let console: Console = name
        .parse()
        .map_err(|_| CliError::unknown_console(name))?;
    let settings = load_settings()?;
    let repository = settings.resolve_repository(repository);
    Ok(settings.console_config(console, &repository))
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::other(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
