//! Where things live inside a console folder.
//!
//! ```text
//! <root>/
//!   roms/                    flat layout: roms.xml (or legacy all.xml) + files
//!   roms/A/A.xml ...         lettered layout: one document and folder per letter
//!   roms_import/             staging folder
//!   roms_new.xml             manifest of the last import's new games
//!   roms_exist.xml           manifest of the last import's duplicates
//!   wiiflow/plugins_data/    frontend plugin data
//!   wiiflow/cache/           frontend cache output
//! ```

use std::io;
use std::path::{Path, PathBuf};

use romshelf_core::ConsoleConfig;
use romshelf_dat::CatalogSource;

pub const ROMS_DIR: &str = "roms";
pub const FLAT_CATALOG: &str = "roms.xml";
pub const LEGACY_CATALOG: &str = "all.xml";
pub const STAGING_DIR: &str = "roms_import";
pub const NEW_MANIFEST: &str = "roms_new.xml";
pub const EXIST_MANIFEST: &str = "roms_exist.xml";

/// Bucket letter used for titles that do not start with `A`..`Z`.
pub const OTHER_LETTER: char = '#';

/// How a console's `roms/` folder is organised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// Every ROM directly under `roms/`.
    Flat,
    /// ROMs grouped under `roms/<L>/` by the first letter of their title.
    Lettered,
}

impl LayoutKind {
    /// Inspect an existing console folder.
    ///
    /// Flat when a flat catalog document exists, lettered when any letter
    /// folder exists, flat otherwise.
    pub fn detect(root: &Path) -> Self {
        let roms = root.join(ROMS_DIR);
        if roms.join(FLAT_CATALOG).is_file() || roms.join(LEGACY_CATALOG).is_file() {
            return Self::Flat;
        }
        if letters().any(|l| roms.join(l.to_string()).is_dir()) {
            return Self::Lettered;
        }
        Self::Flat
    }
}

/// `#`, then `A` through `Z`.
pub fn letters() -> impl Iterator<Item = char> {
    std::iter::once(OTHER_LETTER).chain('A'..='Z')
}

/// Bucket letter for a title: its uppercased first character, or `#`.
pub fn letter_for(title: &str) -> char {
    match title.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some(c) if c.is_ascii_uppercase() => c,
        _ => OTHER_LETTER,
    }
}

/// Resolved folder layout for one console.
#[derive(Debug, Clone)]
pub struct LibraryLayout {
    root: PathBuf,
    kind: LayoutKind,
    staging_dir: PathBuf,
    plugin_dir: PathBuf,
}

impl LibraryLayout {
    /// Layout for a console, detecting flat vs lettered from disk.
    pub fn for_console(config: &ConsoleConfig) -> Self {
        Self::with_kind(config, LayoutKind::detect(&config.root))
    }

    pub fn with_kind(config: &ConsoleConfig, kind: LayoutKind) -> Self {
        let root = config.root.clone();
        let staging_dir = config
            .staging_dir
            .clone()
            .unwrap_or_else(|| root.join(STAGING_DIR));
        let plugin_dir = config
            .plugin_dir
            .clone()
            .unwrap_or_else(|| default_plugin_dir(&root));
        Self {
            root,
            kind,
            staging_dir,
            plugin_dir,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn roms_dir(&self) -> PathBuf {
        self.root.join(ROMS_DIR)
    }

    /// Folder a title's file (or bucket folder) belongs in.
    pub fn parent_for_title(&self, title: &str) -> PathBuf {
        match self.kind {
            LayoutKind::Flat => self.roms_dir(),
            LayoutKind::Lettered => self.roms_dir().join(letter_for(title).to_string()),
        }
    }

    /// Catalog documents to read, each paired with the folder its files live in.
    pub fn catalog_sources(&self) -> Vec<CatalogSource> {
        let roms = self.roms_dir();
        match self.kind {
            LayoutKind::Flat => vec![
                CatalogSource::new(roms.join(FLAT_CATALOG), &roms),
                CatalogSource::new(roms.join(LEGACY_CATALOG), &roms),
            ],
            LayoutKind::Lettered => letters()
                .map(|l| {
                    let dir = roms.join(l.to_string());
                    CatalogSource::new(dir.join(format!("{}.xml", l)), dir)
                })
                .collect(),
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    pub fn new_manifest_path(&self) -> PathBuf {
        self.root.join(NEW_MANIFEST)
    }

    pub fn exist_manifest_path(&self) -> PathBuf {
        self.root.join(EXIST_MANIFEST)
    }

    /// Output folder of the frontend's cache conversion tool.
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("wiiflow").join("cache")
    }

    pub fn ensure_cache_dir(&self) -> io::Result<PathBuf> {
        let dir = self.cache_dir();
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

fn default_plugin_dir(root: &Path) -> PathBuf {
    root.join("wiiflow").join("plugins_data")
}

#[cfg(test)]
mod tests {
    use super::*;
    use romshelf_core::Console;

    #[test]
    fn test_letter_for() {
        assert_eq!(letter_for("Sonic"), 'S');
        assert_eq!(letter_for("bust-a-move"), 'B');
        assert_eq!(letter_for("1941"), '#');
        assert_eq!(letter_for("合金弹头"), '#');
        assert_eq!(letter_for(""), '#');
    }

    #[test]
    fn test_letters_cover_27_buckets() {
        let all: Vec<char> = letters().collect();
        assert_eq!(all.len(), 27);
        assert_eq!(all[0], '#');
        assert_eq!(all[26], 'Z');
    }

    #[test]
    fn test_detect_layout() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(LayoutKind::detect(dir.path()), LayoutKind::Flat);

        std::fs::create_dir_all(dir.path().join("roms").join("S")).unwrap();
        assert_eq!(LayoutKind::detect(dir.path()), LayoutKind::Lettered);

        std::fs::write(dir.path().join("roms").join("roms.xml"), "<Game-List/>").unwrap();
        assert_eq!(LayoutKind::detect(dir.path()), LayoutKind::Flat);
    }

    #[test]
    fn test_default_paths() {
        let config = Console::Mvs.config(Path::new("/repo"));
        let layout = LibraryLayout::with_kind(&config, LayoutKind::Flat);
        assert_eq!(layout.staging_dir(), Path::new("/repo/mvs/roms_import"));
        assert_eq!(
            layout.plugin_dir(),
            Path::new("/repo/mvs/wiiflow/plugins_data")
        );
        assert_eq!(layout.new_manifest_path(), PathBuf::from("/repo/mvs/roms_new.xml"));
        assert_eq!(layout.exist_manifest_path(), PathBuf::from("/repo/mvs/roms_exist.xml"));
        assert_eq!(layout.parent_for_title("1941"), PathBuf::from("/repo/mvs/roms"));
        assert_eq!(layout.catalog_sources().len(), 2);
    }

    #[test]
    fn test_overrides_and_lettered_parents() {
        let config = Console::Ngpc
            .config(Path::new("/repo"))
            .with_staging_dir("/inbox")
            .with_plugin_dir("/sd/plugins_data");
        let layout = LibraryLayout::with_kind(&config, LayoutKind::Lettered);
        assert_eq!(layout.staging_dir(), Path::new("/inbox"));
        assert_eq!(layout.plugin_dir(), Path::new("/sd/plugins_data"));
        assert_eq!(
            layout.parent_for_title("Sonic"),
            PathBuf::from("/repo/ngpc/roms/S")
        );

        let sources = layout.catalog_sources();
        assert_eq!(sources.len(), 27);
        assert_eq!(sources[1].document, PathBuf::from("/repo/ngpc/roms/A/A.xml"));
        assert_eq!(sources[1].rom_dir, PathBuf::from("/repo/ngpc/roms/A"));
    }

    #[test]
    fn test_ensure_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Console::Pocket.config(dir.path());
        let layout = LibraryLayout::for_console(&config);
        let cache = layout.ensure_cache_dir().unwrap();
        assert!(cache.is_dir());
        assert_eq!(cache, dir.path().join("pocket").join("wiiflow").join("cache"));
    }
}
