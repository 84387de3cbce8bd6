//! Consistency audit of a console's catalog against its files and the
//! frontend plugin data. Read-only.

use std::path::PathBuf;

use serde::Serialize;

use romshelf_core::{ConsoleConfig, Fingerprint, hash_file};

use crate::error::IngestError;
use crate::progress::IngestProgress;
use crate::session::LibrarySession;

/// Which title a [`Discrepancy::TitleMismatch`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleField {
    En,
    Localized,
}

impl TitleField {
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Localized => "zhcn",
        }
    }
}

/// One inconsistency found by [`check`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discrepancy {
    #[error("{stored_name}: file missing at {}", .path.display())]
    MissingFile { stored_name: String, path: PathBuf },

    #[error("{stored_name}: could not read {}: {reason}", .path.display())]
    Unreadable {
        stored_name: String,
        path: PathBuf,
        reason: String,
    },

    #[error("{}: crc32 {recorded} in the catalog, {actual} on disk", .path.display())]
    FingerprintMismatch {
        path: PathBuf,
        recorded: Fingerprint,
        actual: Fingerprint,
    },

    #[error("{stored_name} ({fingerprint}) is missing from the alias table")]
    MissingExternalEntry {
        stored_name: String,
        fingerprint: Fingerprint,
    },

    #[error("{stored_name}: {} title '{catalog}' in the catalog, '{external}' in the plugin data", .field.attribute())]
    TitleMismatch {
        stored_name: String,
        field: TitleField,
        catalog: String,
        external: String,
    },
}

/// Outcome of one audit.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub console: String,
    pub checked: usize,
    pub discrepancies: Vec<Discrepancy>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Audit every catalogued record.
///
/// Re-hashes each file, then compares the record's titles with the plugin
/// data. Never stops at the first problem; every discrepancy is logged and
/// collected.
pub fn check(
    config: &ConsoleConfig,
    progress: &dyn IngestProgress,
) -> Result<CheckReport, IngestError> {
    let session = LibrarySession::open(config)?;

    let mut entries: Vec<_> = session.catalog.iter().collect();
    entries.sort_by_key(|e| e.record.fingerprint);
    let total = entries.len();

    progress.on_phase(&format!("Checking {} catalogued game(s) for {}", total, config.name));

    let mut report = CheckReport {
        console: config.name.clone(),
        ..CheckReport::default()
    };
    let mut found = |d: Discrepancy| {
        log::warn!("{}", d);
        report.discrepancies.push(d);
    };

    for (i, entry) in entries.iter().enumerate() {
        let record = &entry.record;
        progress.on_file(i + 1, total, &record.stored_name);

        if !entry.path.is_file() {
            found(Discrepancy::MissingFile {
                stored_name: record.stored_name.clone(),
                path: entry.path.clone(),
            });
        } else {
            match hash_file(&entry.path) {
                Ok(actual) if actual != record.fingerprint => {
                    found(Discrepancy::FingerprintMismatch {
                        path: entry.path.clone(),
                        recorded: record.fingerprint,
                        actual,
                    });
                }
                Ok(_) => {}
                Err(e) => found(Discrepancy::Unreadable {
                    stored_name: record.stored_name.clone(),
                    path: entry.path.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        match session.index.resolve(record.title(), record.fingerprint) {
            None => found(Discrepancy::MissingExternalEntry {
                stored_name: record.stored_name.clone(),
                fingerprint: record.fingerprint,
            }),
            Some(identity) => {
                if identity.english_title != record.english_title {
                    found(Discrepancy::TitleMismatch {
                        stored_name: record.stored_name.clone(),
                        field: TitleField::En,
                        catalog: record.english_title.clone(),
                        external: identity.english_title.clone(),
                    });
                }
                if identity.localized_title != record.localized_title {
                    found(Discrepancy::TitleMismatch {
                        stored_name: record.stored_name.clone(),
                        field: TitleField::Localized,
                        catalog: record.localized_title.clone(),
                        external: identity.localized_title.clone(),
                    });
                }
            }
        }
    }

    report.checked = total;
    progress.on_complete(&format!(
        "Checked {} game(s), {} discrepancy(ies)",
        total,
        report.discrepancies.len()
    ));
    Ok(report)
}
