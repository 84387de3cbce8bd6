use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romshelf_core::ConsoleConfig;
use romshelf_lib::{ImportAction, ImportReport, LibraryLayout, Placement, import, plan_import};

use crate::error::CliError;
use crate::progress::BarProgress;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub(crate) fn run_import(
    config: ConsoleConfig,
    staging: Option<PathBuf>,
    dry_run: bool,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let config = match staging {
        Some(dir) => config.with_staging_dir(dir),
        None => config,
    };
    let layout = LibraryLayout::for_console(&config);

    log::info!(
        "Importing {} from: {}",
        config.name.if_supports_color(Stdout, |t| t.bold()),
        layout
            .staging_dir()
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );

    if dry_run {
        log::info!(
            "{}",
            "Dry run: no files will be moved".if_supports_color(Stdout, |t| t.dimmed()),
        );
        let actions = plan_import(&config)?;
        if json {
            return crate::commands::print_json(&actions);
        }
        print_plan(&actions);
        return Ok(());
    }

    let progress = BarProgress::new(quiet || json);
    let report = import(&config, &progress)?;

    if report.placed_count() > 0 {
        let cache = layout.ensure_cache_dir()?;
        log::info!(
            "  Run the frontend cache tool to refresh {}",
            cache.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }

    if json {
        return crate::commands::print_json(&report);
    }
    print_report(&report);
    Ok(())
}

fn print_plan(actions: &[ImportAction]) {
    if actions.is_empty() {
        log::info!("  Nothing staged");
        return;
    }

    for action in actions {
        match action {
            ImportAction::Place {
                source,
                record,
                placement,
            } => {
                log::info!(
                    "  {} {} {} {}",
                    "+".if_supports_color(Stdout, |t| t.green()),
                    file_name(source),
                    "\u{2192}".if_supports_color(Stdout, |t| t.dimmed()),
                    placement.destination().display(),
                );
                if let Placement::Migrate {
                    existing,
                    migrated_to,
                    ..
                } = placement
                {
                    log::info!(
                        "    {}",
                        format!(
                            "moves {} to {}",
                            existing.display(),
                            migrated_to.display()
                        )
                        .if_supports_color(Stdout, |t| t.dimmed()),
                    );
                }
                if record.english_title.is_empty() {
                    log::info!(
                        "    {}",
                        "no plugin entry, titles left empty".if_supports_color(Stdout, |t| t.dimmed()),
                    );
                }
            }
            ImportAction::Collide {
                source,
                destination,
                ..
            } => {
                log::warn!(
                    "  {} {} {} {} (already occupied)",
                    "!".if_supports_color(Stdout, |t| t.yellow()),
                    file_name(source),
                    "\u{2192}".if_supports_color(Stdout, |t| t.dimmed()),
                    destination.display(),
                );
            }
            ImportAction::AlreadyCatalogued { source, record } => {
                log::info!(
                    "  {} {} already catalogued as {}",
                    "=".if_supports_color(Stdout, |t| t.dimmed()),
                    file_name(source),
                    record.stored_name,
                );
            }
            ImportAction::Skip { source, issue } => {
                log::warn!(
                    "  {} {}: {}",
                    "-".if_supports_color(Stdout, |t| t.red()),
                    file_name(source),
                    issue,
                );
            }
        }
    }
}

fn print_report(report: &ImportReport) {
    for item in report.imported.iter().filter(|i| i.placed) {
        log::info!(
            "  {} {} {} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            file_name(&item.source),
            "\u{2192}".if_supports_color(Stdout, |t| t.dimmed()),
            item.destination.display(),
        );
    }
    for item in &report.existing {
        log::info!(
            "  {} {} already in library as {}",
            "=".if_supports_color(Stdout, |t| t.dimmed()),
            file_name(&item.source),
            item.record.stored_name,
        );
    }

    log::info!("");
    log::info!(
        "  {} imported, {} already in library, {} skipped",
        report.placed_count().if_supports_color(Stdout, |t| t.green()),
        report.existing.len(),
        report.skipped.len(),
    );
    if report.undocumented > 0 {
        log::warn!(
            "  {} destination(s) held files missing from the catalog",
            report.undocumented
        );
    }
    if let Some(ref path) = report.new_manifest {
        log::info!(
            "  New games listed in {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    if let Some(ref path) = report.exist_manifest {
        log::info!(
            "  Duplicates listed in {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }
}
