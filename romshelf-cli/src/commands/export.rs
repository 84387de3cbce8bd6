use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romshelf_core::ConsoleConfig;
use romshelf_lib::export;

use crate::error::CliError;
use crate::progress::BarProgress;

pub(crate) fn run_export(
    config: ConsoleConfig,
    plan: PathBuf,
    dest: PathBuf,
    quiet: bool,
) -> Result<(), CliError> {
    log::info!(
        "Exporting {} using {}",
        config.name.if_supports_color(Stdout, |t| t.bold()),
        plan.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    let progress = BarProgress::new(quiet);
    let report = export(&config, &plan, &dest, &progress)?;

    if !report.missing.is_empty() {
        let missing: Vec<String> = report.missing.iter().map(|fp| fp.to_string()).collect();
        log::warn!(
            "  {} planned game(s) not in the library: {}",
            missing.len(),
            missing.join(", ")
        );
    }
    Ok(())
}
