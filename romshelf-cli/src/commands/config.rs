use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romshelf_lib::settings::{load_settings_string, save_repository, settings_path};

use crate::error::CliError;

/// Show the settings file and the repository it resolves to.
pub(crate) fn run_config_show(repository: Option<PathBuf>) -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "romshelf Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let settings = crate::commands::load_settings()?;
    let source = if repository.is_some() {
        "(--repository)"
    } else if settings.library.repository.is_some() {
        "(settings file)"
    } else {
        "(current directory)"
    };
    log::info!(
        "  Repository:    {} {}",
        settings.resolve_repository(repository).display(),
        source.if_supports_color(Stdout, |t| t.dimmed()),
    );

    if let Some(contents) = load_settings_string() {
        log::info!("");
        for line in contents.lines() {
            log::info!("  {}", line);
        }
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}

pub(crate) fn run_config_set_repository(path: PathBuf) -> Result<(), CliError> {
    if !path.is_dir() {
        return Err(CliError::config(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    let path = path.canonicalize()?;
    save_repository(Some(&path)).map_err(|e| CliError::config(e.to_string()))?;
    log::info!(
        "{} Repository set to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

pub(crate) fn run_config_clear_repository() -> Result<(), CliError> {
    save_repository(None).map_err(|e| CliError::config(e.to_string()))?;
    log::info!(
        "{} Saved repository cleared",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
    );
    Ok(())
}
