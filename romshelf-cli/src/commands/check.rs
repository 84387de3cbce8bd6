use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romshelf_core::ConsoleConfig;
use romshelf_lib::check;

use crate::error::CliError;
use crate::progress::BarProgress;

pub(crate) fn run_check(config: ConsoleConfig, json: bool, quiet: bool) -> Result<(), CliError> {
    log::info!(
        "Checking {} in: {}",
        config.name.if_supports_color(Stdout, |t| t.bold()),
        config.root.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    let progress = BarProgress::new(quiet || json);
    let report = check(&config, &progress)?;

    if json {
        return crate::commands::print_json(&report);
    }

    // Each discrepancy was already logged as it was found
    if report.is_clean() {
        log::info!(
            "  {} {} game(s), catalog matches files and plugin data",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            report.checked,
        );
    } else {
        log::warn!(
            "  {} discrepancy(ies) across {} game(s)",
            report.discrepancies.len(),
            report.checked,
        );
    }
    Ok(())
}
