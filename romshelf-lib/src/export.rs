//! Copying catalogued ROMs out of the library according to an export plan.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use romshelf_core::{ConsoleConfig, Fingerprint};
use romshelf_dat::ExportPlan;

use crate::error::IngestError;
use crate::progress::IngestProgress;
use crate::session::LibrarySession;

/// Outcome of one export run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    pub console: String,
    pub copied: Vec<PathBuf>,
    /// Destinations that already existed and were left alone.
    pub skipped_existing: Vec<PathBuf>,
    /// Planned fingerprints with no catalogued file.
    pub missing: Vec<Fingerprint>,
    /// Folders or copies that could not be created.
    pub failed: Vec<FailedCopy>,
}

/// One folder or file the export could not write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedCopy {
    pub path: PathBuf,
    pub reason: String,
}

impl ExportReport {
    fn fail(&mut self, path: PathBuf, err: &std::io::Error) {
        log::warn!("Could not write {}: {}", path.display(), err);
        self.failed.push(FailedCopy {
            path,
            reason: err.to_string(),
        });
    }
}

/// Copy every game listed in the plan at `plan_path` into `dest`.
///
/// Files are named `<rom>.<ext>` inside the plan's folders. Existing files are
/// never overwritten. A folder or copy that fails is recorded and the rest of
/// the plan still runs.
pub fn export(
    config: &ConsoleConfig,
    plan_path: &Path,
    dest: &Path,
    progress: &dyn IngestProgress,
) -> Result<ExportReport, IngestError> {
    if !plan_path.is_file() {
        return Err(IngestError::MissingFile(plan_path.to_path_buf()));
    }
    let plan = ExportPlan::parse_file(plan_path)?;
    let session = LibrarySession::open_catalog_only(config)?;
    export_plan(&session, &plan, dest, progress)
}

/// Run an already-parsed plan against an open session.
pub fn export_plan(
    session: &LibrarySession,
    plan: &ExportPlan,
    dest: &Path,
    progress: &dyn IngestProgress,
) -> Result<ExportReport, IngestError> {
    let config = &session.config;
    fs::create_dir_all(dest)?;

    let mut report = ExportReport {
        console: config.name.clone(),
        ..ExportReport::default()
    };

    for folder in &plan.folders {
        let path = dest.join(folder);
        if let Err(e) = fs::create_dir_all(&path) {
            report.fail(path, &e);
        }
    }

    let total = plan.games.len();
    progress.on_phase(&format!(
        "Exporting {} game(s) to {}",
        total,
        dest.display()
    ));

    for (i, game) in plan.games.iter().enumerate() {
        progress.on_file(i + 1, total, &game.rom);

        let Some(entry) = session
            .catalog
            .entry(game.fingerprint)
            .filter(|e| e.path.is_file())
        else {
            log::warn!("No ROM file for crc32 = {}", game.fingerprint);
            report.missing.push(game.fingerprint);
            continue;
        };

        let target = dest.join(&game.folder).join(config.rom_file_name(&game.rom));
        if target.exists() {
            log::debug!("{} already exists", target.display());
            report.skipped_existing.push(target);
            continue;
        }

        let copied = match target.parent() {
            Some(parent) => fs::create_dir_all(parent),
            None => Ok(()),
        }
        .and_then(|_| fs::copy(&entry.path, &target));
        if let Err(e) = copied {
            report.fail(target, &e);
            continue;
        }
        log::debug!("{} -> {}", entry.path.display(), target.display());
        report.copied.push(target);
    }

    progress.on_complete(&format!(
        "Copied {} ROM(s), {} already present, {} missing, {} failed",
        report.copied.len(),
        report.skipped_existing.len(),
        report.missing.len(),
        report.failed.len()
    ));
    Ok(report)
}
