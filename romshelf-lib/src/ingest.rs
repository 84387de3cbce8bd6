//! Importing staged ROMs into a console's library.
//!
//! A run hashes every candidate in the staging folder and sorts it into one
//! of three outcomes:
//!
//! - already catalogued: left in staging, listed in `roms_exist.xml`;
//! - new: moved under `roms/` and listed in `roms_new.xml` for an operator
//!   to merge into the catalog;
//! - skipped: left in staging with the reason logged.
//!
//! The catalog documents themselves are never modified.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use romshelf_core::{
    ConsoleConfig, Fingerprint, GameRecord, hash_file, language_from_title, stem_of,
};
use romshelf_dat::replace_manifest;

use crate::error::{IngestError, ItemIssue};
use crate::layout::LibraryLayout;
use crate::placement::{self, Placement};
use crate::progress::IngestProgress;
use crate::scanner::scan_staging;
use crate::session::LibrarySession;

/// A staged file that was (or would be) added to the library.
#[derive(Debug, Clone, Serialize)]
pub struct ImportedItem {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Manifest entry; `stored_name` is the title file name, not the bucket file name.
    pub record: GameRecord,
    /// False when the destination was already occupied and the file stayed in staging.
    pub placed: bool,
}

/// A staged file whose content is already in the library.
#[derive(Debug, Clone, Serialize)]
pub struct ExistingItem {
    pub source: PathBuf,
    /// The catalogued record with the same fingerprint.
    pub record: GameRecord,
}

/// A staged file left untouched because of a problem.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedItem {
    pub source: PathBuf,
    pub issue: ItemIssue,
}

/// Outcome of one import run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub console: String,
    pub imported: Vec<ImportedItem>,
    pub existing: Vec<ExistingItem>,
    pub skipped: Vec<SkippedItem>,
    /// New items whose destination already held an uncatalogued file.
    pub undocumented: usize,
    /// Flat files moved into bucket folders to make room.
    pub migrated: Vec<PathBuf>,
    pub new_manifest: Option<PathBuf>,
    pub exist_manifest: Option<PathBuf>,
}

impl ImportReport {
    fn new(console: &str) -> Self {
        Self {
            console: console.to_string(),
            ..Self::default()
        }
    }

    /// Number of items placed in the library.
    pub fn placed_count(&self) -> usize {
        self.imported.iter().filter(|i| i.placed).count()
    }
}

/// One planned decision from [`plan_import`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ImportAction {
    Place {
        source: PathBuf,
        record: GameRecord,
        placement: Placement,
    },
    Collide {
        source: PathBuf,
        record: GameRecord,
        destination: PathBuf,
    },
    AlreadyCatalogued {
        source: PathBuf,
        record: GameRecord,
    },
    Skip {
        source: PathBuf,
        issue: ItemIssue,
    },
}

enum Classified {
    Existing(GameRecord),
    New(GameRecord),
    Skipped(ItemIssue),
}

/// Import every candidate in the console's staging folder.
///
/// Fails with [`IngestError::MissingFolder`] before touching anything when the
/// staging folder does not exist. Per-file problems never abort the run.
pub fn import(
    config: &ConsoleConfig,
    progress: &dyn IngestProgress,
) -> Result<ImportReport, IngestError> {
    let session = open_with_staging(config)?;
    let layout = &session.layout;
    let candidates = scan_staging(layout.staging_dir(), config)?;
    let total = candidates.len();

    progress.on_phase(&format!(
        "Importing {} staged file(s) for {}",
        total, config.name
    ));

    let mut report = ImportReport::new(&config.name);
    let mut seen: HashMap<Fingerprint, GameRecord> = HashMap::new();

    for (i, source) in candidates.iter().enumerate() {
        let name = display_name(source);
        progress.on_file(i + 1, total, &name);

        let record = match classify(&session, source, &seen) {
            Classified::Existing(record) => {
                log::info!(
                    "{} already exists as {}, crc32 = {}",
                    name,
                    record.stored_name,
                    record.fingerprint
                );
                report.existing.push(ExistingItem {
                    source: source.clone(),
                    record,
                });
                continue;
            }
            Classified::Skipped(issue) => {
                skip(&mut report, source, issue);
                continue;
            }
            Classified::New(record) => record,
        };

        let placement = match resolve_placement(layout, &record, &config.extension) {
            Ok(p) => p,
            Err(issue) => {
                skip(&mut report, source, issue);
                continue;
            }
        };

        if let Some(occupant) = placement.occupant() {
            let destination = occupant.to_path_buf();
            log::warn!(
                "{}",
                ItemIssue::DestinationCollision {
                    destination: destination.clone()
                }
            );
            report.undocumented += 1;
            seen.insert(record.fingerprint, record.clone());
            report.imported.push(ImportedItem {
                source: source.clone(),
                destination,
                record,
                placed: false,
            });
            continue;
        }

        match placement::prepare(&placement) {
            Ok(Some(migrated)) => report.migrated.push(migrated),
            Ok(None) => {}
            Err(e) => {
                skip(
                    &mut report,
                    source,
                    ItemIssue::move_failed(placement.destination(), &e),
                );
                continue;
            }
        }

        let destination = placement.destination().to_path_buf();
        if let Err(e) = placement::move_file(source, &destination) {
            skip(&mut report, source, ItemIssue::move_failed(&destination, &e));
            continue;
        }
        log::info!("{} -> {}", name, destination.display());

        seen.insert(record.fingerprint, record.clone());
        report.imported.push(ImportedItem {
            source: source.clone(),
            destination,
            record,
            placed: true,
        });
    }

    write_manifests(layout, &mut report)?;
    progress.on_complete(&summary(&report));
    Ok(report)
}

/// Classify every staged file without changing anything on disk.
pub fn plan_import(config: &ConsoleConfig) -> Result<Vec<ImportAction>, IngestError> {
    let session = open_with_staging(config)?;
    let layout = &session.layout;
    let candidates = scan_staging(layout.staging_dir(), config)?;

    let mut seen: HashMap<Fingerprint, GameRecord> = HashMap::new();
    let mut actions = Vec::with_capacity(candidates.len());

    for source in candidates {
        let action = match classify(&session, &source, &seen) {
            Classified::Existing(record) => ImportAction::AlreadyCatalogued { source, record },
            Classified::Skipped(issue) => ImportAction::Skip { source, issue },
            Classified::New(record) => {
                match resolve_placement(layout, &record, &config.extension) {
                    Err(issue) => ImportAction::Skip { source, issue },
                    Ok(placement) => {
                        seen.insert(record.fingerprint, record.clone());
                        if let Some(occupant) = placement.occupant() {
                            ImportAction::Collide {
                                source,
                                record,
                                destination: occupant.to_path_buf(),
                            }
                        } else {
                            ImportAction::Place {
                                source,
                                record,
                                placement,
                            }
                        }
                    }
                }
            }
        };
        actions.push(action);
    }

    Ok(actions)
}

fn open_with_staging(config: &ConsoleConfig) -> Result<LibrarySession, IngestError> {
    let layout = LibraryLayout::for_console(config);
    if !layout.staging_dir().is_dir() {
        return Err(IngestError::MissingFolder(layout.staging_dir().to_path_buf()));
    }
    LibrarySession::open(config)
}

fn classify(
    session: &LibrarySession,
    source: &Path,
    seen: &HashMap<Fingerprint, GameRecord>,
) -> Classified {
    let config = &session.config;

    let fingerprint = match hash_file(source) {
        Ok(fp) => fp,
        Err(e) => return Classified::Skipped(ItemIssue::hash_failed(source, &e)),
    };

    if let Some(record) = session.catalog.lookup(fingerprint) {
        return Classified::Existing(record.clone());
    }
    if let Some(record) = seen.get(&fingerprint) {
        return Classified::Existing(record.clone());
    }

    let byte_size = match std::fs::metadata(source) {
        Ok(m) => m.len(),
        Err(e) => return Classified::Skipped(ItemIssue::hash_failed(source, &e)),
    };

    let file_name = display_name(source);
    let title = stem_of(&file_name);

    let mut record = match session.index.resolve(title, fingerprint) {
        Some(identity) => GameRecord {
            fingerprint,
            byte_size,
            stored_name: identity
                .stored_name
                .clone()
                .unwrap_or_else(|| config.rom_file_name(title)),
            english_title: identity.english_title.clone(),
            localized_title: identity.localized_title.clone(),
            language: None,
        },
        None if config.strict_identity => {
            return Classified::Skipped(ItemIssue::UnknownExternalIdentity {
                title: title.to_string(),
                fingerprint,
            });
        }
        None => {
            log::debug!("{} has no external identity, keeping its name", file_name);
            GameRecord {
                fingerprint,
                byte_size,
                stored_name: config.rom_file_name(title),
                english_title: String::new(),
                localized_title: String::new(),
                language: None,
            }
        }
    };
    // The marker comes from the staged name, which a resolved identity may replace
    record.language = language_from_title(title);

    Classified::New(record)
}

fn resolve_placement(
    layout: &LibraryLayout,
    record: &GameRecord,
    extension: &str,
) -> Result<Placement, ItemIssue> {
    let title = record.title();
    let parent = layout.parent_for_title(title);
    placement::resolve_destination(&parent, title, record.fingerprint, extension).map_err(|e| {
        ItemIssue::hash_failed(parent.join(format!("{}.{}", title, extension)), &e)
    })
}

fn skip(report: &mut ImportReport, source: &Path, issue: ItemIssue) {
    log::warn!("Skipped {}: {}", display_name(source), issue);
    report.skipped.push(SkippedItem {
        source: source.to_path_buf(),
        issue,
    });
}

/// Replace both manifests. Stale files are always removed first; a manifest
/// is only written when it has entries.
fn write_manifests(layout: &LibraryLayout, report: &mut ImportReport) -> Result<(), IngestError> {
    let mut listed = HashSet::new();
    let exist_records: Vec<GameRecord> = report
        .existing
        .iter()
        .filter(|item| listed.insert(item.record.fingerprint))
        .map(|item| item.record.clone())
        .collect();
    let exist_path = layout.exist_manifest_path();
    if replace_manifest(&exist_path, &exist_records)? {
        report.exist_manifest = Some(exist_path);
    }

    let new_records: Vec<GameRecord> = report.imported.iter().map(|i| i.record.clone()).collect();
    let new_path = layout.new_manifest_path();
    if replace_manifest(&new_path, &new_records)? {
        report.new_manifest = Some(new_path);
    }

    Ok(())
}

fn summary(report: &ImportReport) -> String {
    if report.imported.is_empty() {
        "No new games".to_string()
    } else {
        format!("Found {} new game(s)", report.imported.len())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
