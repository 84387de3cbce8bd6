use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use romshelf_core::{Fingerprint, GameRecord, normalize_extension, stem_of};

use crate::error::DatError;

/// One catalog document and the folder its ROMs are stored in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    pub document: PathBuf,
    pub rom_dir: PathBuf,
}

impl CatalogSource {
    pub fn new(document: impl Into<PathBuf>, rom_dir: impl Into<PathBuf>) -> Self {
        Self {
            document: document.into(),
            rom_dir: rom_dir.into(),
        }
    }
}

/// A catalogued game together with where its file was found.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub record: GameRecord,
    /// Resolved file location. Points at the flat location when the file is missing.
    pub path: PathBuf,
    pub present: bool,
}

/// In-memory view of a console's catalog, keyed by fingerprint.
#[derive(Debug, Default)]
pub struct GameCatalog {
    entries: HashMap<Fingerprint, CatalogEntry>,
}

impl GameCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every source into the catalog.
    ///
    /// Does nothing when the catalog is already populated; use [`reload`](Self::reload)
    /// to force a fresh read. Missing documents are skipped. When the same
    /// fingerprint appears more than once, the first occurrence wins.
    /// Stored names written as a bare title get `extension` appended.
    pub fn load(&mut self, sources: &[CatalogSource], extension: &str) -> Result<usize, DatError> {
        if !self.entries.is_empty() {
            return Ok(self.entries.len());
        }

        let extension = normalize_extension(extension);
        for source in sources {
            if !source.document.is_file() {
                log::debug!("No catalog at {}", source.document.display());
                continue;
            }

            let records = parse_catalog_file(&source.document)?;
            log::debug!(
                "Read {} entries from {}",
                records.len(),
                source.document.display()
            );

            for mut record in records {
                complete_stored_name(&mut record, &extension);
                if let Some(existing) = self.entries.get(&record.fingerprint) {
                    log::warn!(
                        "Duplicate fingerprint {} in {}: '{}' already catalogued as '{}'",
                        record.fingerprint,
                        source.document.display(),
                        record.stored_name,
                        existing.record.stored_name
                    );
                    continue;
                }
                let (path, present) = resolve_record_path(&source.rom_dir, &record);
                if !present {
                    log::warn!(
                        "Catalogued file missing: {} ({})",
                        path.display(),
                        record.fingerprint
                    );
                }
                self.entries.insert(
                    record.fingerprint,
                    CatalogEntry {
                        record,
                        path,
                        present,
                    },
                );
            }
        }

        Ok(self.entries.len())
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Discard the in-memory view and read the sources again.
    pub fn reload(&mut self, sources: &[CatalogSource], extension: &str) -> Result<usize, DatError> {
        self.reset();
        self.load(sources, extension)
    }

    pub fn lookup(&self, fingerprint: Fingerprint) -> Option<&GameRecord> {
        self.entries.get(&fingerprint).map(|e| &e.record)
    }

    pub fn entry(&self, fingerprint: Fingerprint) -> Option<&CatalogEntry> {
        self.entries.get(&fingerprint)
    }

    pub fn path_of(&self, fingerprint: Fingerprint) -> Option<&Path> {
        self.entries.get(&fingerprint).map(|e| e.path.as_path())
    }

    pub fn contains(&self, fingerprint: Fingerprint) -> bool {
        self.entries.contains_key(&fingerprint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Entries ordered by stored name, for stable reports.
    pub fn sorted_entries(&self) -> Vec<&CatalogEntry> {
        let mut entries: Vec<&CatalogEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            a.record
                .stored_name
                .cmp(&b.record.stored_name)
                .then(a.record.fingerprint.cmp(&b.record.fingerprint))
        });
        entries
    }
}

/// Find a record's file under `rom_dir`.
///
/// Tries the flat location `<rom_dir>/<stored_name>` first, then the bucketed
/// location `<rom_dir>/<stem>/<FINGERPRINT><.ext>` used when several dumps share a
/// title. Returns the flat path with `false` when neither exists.
pub fn resolve_record_path(rom_dir: &Path, record: &GameRecord) -> (PathBuf, bool) {
    let flat = rom_dir.join(&record.stored_name);
    if flat.is_file() {
        return (flat, true);
    }

    let bucketed = rom_dir
        .join(stem_of(&record.stored_name))
        .join(bucket_file_name(record));
    if bucketed.is_file() {
        return (bucketed, true);
    }

    (flat, false)
}

fn complete_stored_name(record: &mut GameRecord, extension: &str) {
    let has_extension = Path::new(&record.stored_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));
    if !has_extension && !extension.is_empty() {
        record.stored_name = format!("{}.{}", record.stored_name, extension);
    }
}

fn bucket_file_name(record: &GameRecord) -> String {
    match Path::new(&record.stored_name)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some(ext) => format!("{}.{}", record.fingerprint, ext),
        None => record.fingerprint.to_string(),
    }
}

/// Parse a catalog document from a file path.
pub fn parse_catalog_file(path: &Path) -> Result<Vec<GameRecord>, DatError> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    parse_catalog(reader)
}

/// Parse a catalog document: a root element holding `<Game>` elements.
///
/// Entries without a usable fingerprint are skipped with a warning. The legacy
/// `zip` attribute (title without extension) is accepted in place of `rom`.
pub fn parse_catalog<R: BufRead>(reader: R) -> Result<Vec<GameRecord>, DatError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut records = Vec::new();
    let mut saw_root = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if e.name().as_ref() == b"Game" {
                    if let Some(record) = parse_game_attributes(e)? {
                        records.push(record);
                    }
                } else {
                    saw_root = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root && records.is_empty() {
        return Err(DatError::invalid_document("No root element in catalog"));
    }

    Ok(records)
}

fn parse_game_attributes(e: &BytesStart<'_>) -> Result<Option<GameRecord>, DatError> {
    let mut crc = None;
    let mut bytes = None;
    let mut rom = None;
    let mut legacy_zip = None;
    let mut english = String::new();
    let mut localized = String::new();
    let mut language = None;

    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"crc32" => crc = Some(value),
            b"bytes" => bytes = Some(value),
            b"rom" => rom = Some(value),
            b"zip" => legacy_zip = Some(value),
            b"en" => english = value,
            b"zhcn" => localized = value,
            b"language" => language = Some(value),
            _ => {}
        }
    }

    let Some(crc) = crc else {
        log::warn!("Catalog entry without crc32 skipped");
        return Ok(None);
    };
    let fingerprint: Fingerprint = match crc.parse() {
        Ok(fp) => fp,
        Err(e) => {
            log::warn!("Catalog entry skipped: {}", e);
            return Ok(None);
        }
    };

    let byte_size = match bytes {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| DatError::invalid_document(format!("Invalid byte size: {value}")))?,
        None => 0,
    };

    let stored_name = match (rom, legacy_zip) {
        (Some(rom), _) => rom,
        (None, Some(title)) => format!("{}.zip", title),
        (None, None) => {
            log::warn!("Catalog entry {} has no file name, skipped", fingerprint);
            return Ok(None);
        }
    };

    let language = language.filter(|l| !l.is_empty());

    Ok(Some(GameRecord {
        fingerprint,
        byte_size,
        stored_name,
        english_title: english,
        localized_title: localized,
        language,
    }))
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
