//! Frontend plugin data: the alias table (`<P>.ini`) and the title table
//! (`<P>.xml`), joined into one lookup from a ROM to its external identity.
//!
//! Layout under the plugin data folder:
//!
//! ```text
//! plugins_data/NEOGEO/NEOGEO.ini
//! plugins_data/NEOGEO/NEOGEO.xml
//! ```

use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use romshelf_core::{Fingerprint, normalize_extension};

use crate::error::DatError;

/// Locale code of the English title.
pub const ENGLISH_LOCALE: &str = "EN";
/// Locale code of the localized (Simplified Chinese) title.
pub const LOCALIZED_LOCALE: &str = "ZHCN";

/// Path of the alias table for `plugin_name` inside `plugin_dir`.
pub fn alias_table_path(plugin_dir: &Path, plugin_name: &str) -> PathBuf {
    plugin_dir
        .join(plugin_name)
        .join(format!("{}.ini", plugin_name))
}

/// Path of the title table for `plugin_name` inside `plugin_dir`.
pub fn title_table_path(plugin_dir: &Path, plugin_name: &str) -> PathBuf {
    plugin_dir
        .join(plugin_name)
        .join(format!("{}.xml", plugin_name))
}

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

/// Mapping from alias titles and fingerprints to external identifiers.
///
/// Parsed from the section named after the plugin. Each line is
/// `title=identifier|fingerprint|fingerprint...`.
#[derive(Debug, Default, Clone)]
pub struct AliasTable {
    by_title: HashMap<String, String>,
    by_fingerprint: HashMap<Fingerprint, String>,
    /// Alias titles per identifier, in file order.
    titles_by_identity: HashMap<String, Vec<String>>,
}

impl AliasTable {
    /// Parse the lines of `section` from an INI document. Other sections are ignored.
    pub fn parse<R: BufRead>(reader: R, section: &str) -> Result<Self, DatError> {
        let mut table = Self::default();
        let mut in_section = false;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = if index == 0 {
                line.trim_start_matches('\u{feff}')
            } else {
                line.as_str()
            };
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }

            if let Some(name) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                in_section = name.trim() == section;
                continue;
            }

            if !in_section {
                continue;
            }

            let Some((title, value)) = trimmed.split_once('=') else {
                log::warn!("Line {} of alias table has no '=': {}", index + 1, trimmed);
                continue;
            };
            table.insert(title.trim(), value);
        }

        Ok(table)
    }

    pub fn parse_file(path: &Path, section: &str) -> Result<Self, DatError> {
        let file = std::fs::File::open(path)?;
        Self::parse(std::io::BufReader::new(file), section)
    }

    fn insert(&mut self, title: &str, value: &str) {
        let mut parts = value.split('|').map(str::trim);
        let identifier = parts.next().unwrap_or_default();
        if title.is_empty() || identifier.is_empty() {
            log::warn!("Alias '{}' has no identifier, skipped", title);
            return;
        }

        if let Some(previous) = self.by_title.insert(title.to_string(), identifier.to_string()) {
            log::warn!(
                "Alias '{}' listed twice ({} then {}), keeping the last",
                title,
                previous,
                identifier
            );
            if let Some(titles) = self.titles_by_identity.get_mut(&previous) {
                titles.retain(|t| t != title);
            }
        }
        self.titles_by_identity
            .entry(identifier.to_string())
            .or_default()
            .push(title.to_string());

        for part in parts.filter(|p| !p.is_empty()) {
            match part.parse::<Fingerprint>() {
                Ok(fp) => {
                    self.by_fingerprint.insert(fp, identifier.to_string());
                }
                Err(e) => log::warn!("Alias '{}': {}", title, e),
            }
        }
    }

    pub fn identifier_for_title(&self, title: &str) -> Option<&str> {
        self.by_title.get(title).map(String::as_str)
    }

    pub fn identifier_for_fingerprint(&self, fingerprint: Fingerprint) -> Option<&str> {
        self.by_fingerprint.get(&fingerprint).map(String::as_str)
    }

    /// Alias titles pointing at `identifier`, in file order.
    pub fn titles_for(&self, identifier: &str) -> &[String] {
        self.titles_by_identity
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Title table
// ---------------------------------------------------------------------------

/// Titles of one external identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityTitles {
    /// The `name` attribute; may list several titles separated by `" / "`.
    pub name: String,
    pub english: String,
    pub localized: String,
}

/// Mapping from external identifier to its titles.
#[derive(Debug, Default, Clone)]
pub struct TitleTable {
    entries: HashMap<String, IdentityTitles>,
}

#[derive(Default)]
struct PendingGame {
    name: String,
    id: String,
    english: String,
    localized: String,
}

#[derive(Clone, Copy)]
enum TextTarget {
    None,
    Id,
    Title,
}

impl TitleTable {
    /// Parse a title table: `<game name>` elements holding an `<id>` and
    /// `<locale lang>` children with a `<title>`.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, DatError> {
        let mut xml = Reader::from_reader(reader);
        xml.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut table = Self::default();
        let mut current: Option<PendingGame> = None;
        let mut locale = String::new();
        let mut target = TextTarget::None;

        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.name().as_ref() {
                    b"game" => {
                        current = Some(PendingGame {
                            name: attribute(e, b"name")?.unwrap_or_default(),
                            ..PendingGame::default()
                        });
                    }
                    b"id" if current.is_some() => target = TextTarget::Id,
                    b"locale" if current.is_some() => {
                        locale = attribute(e, b"lang")?.unwrap_or_default();
                    }
                    b"title" if !locale.is_empty() => target = TextTarget::Title,
                    _ => {}
                },
                Event::Text(ref e) => {
                    if let Some(game) = current.as_mut() {
                        let text = e.unescape()?;
                        match target {
                            TextTarget::Id => game.id.push_str(&text),
                            TextTarget::Title if locale.eq_ignore_ascii_case(ENGLISH_LOCALE) => {
                                game.english.push_str(&text)
                            }
                            TextTarget::Title if locale.eq_ignore_ascii_case(LOCALIZED_LOCALE) => {
                                game.localized.push_str(&text)
                            }
                            _ => {}
                        }
                    }
                }
                Event::End(ref e) => match e.name().as_ref() {
                    b"game" => {
                        if let Some(game) = current.take() {
                            table.insert(game);
                        }
                        locale.clear();
                        target = TextTarget::None;
                    }
                    b"locale" => {
                        locale.clear();
                        target = TextTarget::None;
                    }
                    b"id" | b"title" => target = TextTarget::None,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(table)
    }

    pub fn parse_file(path: &Path) -> Result<Self, DatError> {
        let file = std::fs::File::open(path)?;
        Self::parse(std::io::BufReader::new(file))
    }

    fn insert(&mut self, game: PendingGame) {
        let id = game.id.trim().to_string();
        if id.is_empty() {
            log::warn!("Title entry '{}' has no id, skipped", game.name);
            return;
        }

        let titles = IdentityTitles {
            name: game.name,
            english: game.english.trim().to_string(),
            localized: game.localized.trim().to_string(),
        };
        if !titles.english.is_empty()
            && !titles.name.split(" / ").any(|n| n == titles.english)
        {
            log::warn!(
                "{}: English title '{}' not among names '{}'",
                id,
                titles.english,
                titles.name
            );
        }
        self.entries.insert(id, titles);
    }

    pub fn get(&self, identifier: &str) -> Option<&IdentityTitles> {
        self.entries.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, DatError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Joined index
// ---------------------------------------------------------------------------

/// A fully resolved external identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub identifier: String,
    pub english_title: String,
    pub localized_title: String,
    /// Canonical file name (last alias title plus extension); `None` when the
    /// identity has no alias.
    pub stored_name: Option<String>,
}

/// Alias and title tables joined into one lookup.
///
/// Construction performs the join, so every identity reachable from
/// [`resolve`](Self::resolve) already carries its canonical stored name.
#[derive(Debug, Default)]
pub struct ExternalMetadataIndex {
    aliases: AliasTable,
    identities: HashMap<String, ResolvedIdentity>,
}

impl ExternalMetadataIndex {
    pub fn new(aliases: AliasTable, titles: &TitleTable, extension: &str) -> Self {
        let extension = normalize_extension(extension);
        let mut identities = HashMap::new();

        for (identifier, entry) in &titles.entries {
            let stored_name = aliases
                .titles_for(identifier)
                .last()
                .map(|title| format!("{}.{}", title, extension));

            if let Some(title) = aliases.titles_for(identifier).last() {
                if *title != entry.english {
                    log::warn!(
                        "{}: alias '{}' differs from English title '{}'",
                        identifier,
                        title,
                        entry.english
                    );
                }
            }

            identities.insert(
                identifier.clone(),
                ResolvedIdentity {
                    identifier: identifier.clone(),
                    english_title: entry.english.clone(),
                    localized_title: entry.localized.clone(),
                    stored_name,
                },
            );
        }

        let mut orphans: Vec<&String> = aliases
            .titles_by_identity
            .keys()
            .filter(|id| !identities.contains_key(*id))
            .collect();
        orphans.sort();
        for id in orphans {
            log::warn!("{} is listed in the alias table but has no titles", id);
        }

        Self {
            aliases,
            identities,
        }
    }

    /// Read `<P>.ini` and `<P>.xml` from `plugin_dir/<P>/`.
    ///
    /// A missing document is reported and treated as empty; a malformed one is an error.
    pub fn load(plugin_dir: &Path, plugin_name: &str, extension: &str) -> Result<Self, DatError> {
        let ini = alias_table_path(plugin_dir, plugin_name);
        let aliases = if ini.is_file() {
            AliasTable::parse_file(&ini, plugin_name)?
        } else {
            log::warn!("Alias table not found: {}", ini.display());
            AliasTable::default()
        };

        let xml = title_table_path(plugin_dir, plugin_name);
        let titles = if xml.is_file() {
            TitleTable::parse_file(&xml)?
        } else {
            log::warn!("Title table not found: {}", xml.display());
            TitleTable::default()
        };

        log::debug!(
            "{}: {} aliases, {} titles",
            plugin_name,
            aliases.len(),
            titles.len()
        );
        Ok(Self::new(aliases, &titles, extension))
    }

    /// Look up a ROM by title first, then by fingerprint.
    pub fn resolve(&self, title: &str, fingerprint: Fingerprint) -> Option<&ResolvedIdentity> {
        let identifier = self
            .aliases
            .identifier_for_title(title)
            .or_else(|| self.aliases.identifier_for_fingerprint(fingerprint))?;
        self.identities.get(identifier)
    }

    /// Look up an identity by identifier.
    pub fn identity(&self, identifier: &str) -> Option<&ResolvedIdentity> {
        self.identities.get(identifier)
    }

    /// True if `title` appears as an alias in the alias table.
    pub fn has_alias(&self, title: &str) -> bool {
        self.aliases.identifier_for_title(title).is_some()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/plugin_tests.rs"]
mod tests;
