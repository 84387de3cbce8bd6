use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romshelf_core::Console;
use romshelf_lib::{LayoutKind, LibraryLayout};

use crate::error::CliError;

pub(crate) fn run_list(repository: Option<PathBuf>) -> Result<(), CliError> {
    let settings = crate::commands::load_settings()?;
    let repository = settings.resolve_repository(repository);

    log::info!(
        "Supported consoles in {}:",
        repository.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!("");

    for &console in Console::all() {
        let config = settings.console_config(console, &repository);

        let layout = if config.root.is_dir() {
            match LibraryLayout::for_console(&config).kind() {
                LayoutKind::Flat => "flat".to_string(),
                LayoutKind::Lettered => "lettered".to_string(),
            }
        } else {
            format!("{}", "missing".if_supports_color(Stdout, |t| t.yellow()))
        };

        log::info!(
            "  {} [{}]{}",
            console.short_name().if_supports_color(Stdout, |t| t.bold()),
            console.display_name().if_supports_color(Stdout, |t| t.cyan()),
            if settings.console_override(console).is_some() {
                format!(" {}", "(overridden)".if_supports_color(Stdout, |t| t.green()))
            } else {
                String::new()
            },
        );
        log::info!("    Folder: {} ({})", config.root.display(), layout);
        log::info!(
            "    Extension: .{}  Plugin: {}  Identity: {}",
            config.extension,
            config.plugin_name,
            if config.strict_identity {
                "strict"
            } else {
                "lenient"
            },
        );
        log::info!("    Names: {}", console.aliases().join(", "));
    }
    Ok(())
}
