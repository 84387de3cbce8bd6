//! Shared application settings (repository path, per-console overrides).
//!
//! The settings file is always `~/.config/romshelf/settings.toml`:
//!
//! ```toml
//! [library]
//! repository = "/games/neogeo"
//!
//! [consoles.ngpc]
//! staging_dir = "/downloads/ngpc"
//! strict_identity = false
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use romshelf_core::{Console, ConsoleConfig};

/// Canonical path to the settings file: `~/.config/romshelf/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("romshelf").join("settings.toml")
}

/// Parsed settings file. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub library: LibrarySettings,
    #[serde(default)]
    pub consoles: BTreeMap<String, ConsoleOverride>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibrarySettings {
    pub repository: Option<PathBuf>,
}

/// Fields that replace a console preset's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleOverride {
    /// Folder name under the repository.
    pub folder: Option<String>,
    pub extension: Option<String>,
    /// Plugin name (e.g. `NEOGEO`).
    pub plugin: Option<String>,
    pub strict_identity: Option<bool>,
    pub plugin_dir: Option<PathBuf>,
    pub staging_dir: Option<PathBuf>,
}

impl ConsoleOverride {
    pub fn apply(&self, mut config: ConsoleConfig, repository: &Path) -> ConsoleConfig {
        if let Some(ref folder) = self.folder {
            config.root = repository.join(folder);
        }
        if let Some(ref extension) = self.extension {
            config = config.with_extension(extension);
        }
        if let Some(ref plugin) = self.plugin {
            config.plugin_name = plugin.clone();
        }
        if let Some(strict) = self.strict_identity {
            config.strict_identity = strict;
        }
        if let Some(ref dir) = self.plugin_dir {
            config = config.with_plugin_dir(dir);
        }
        if let Some(ref dir) = self.staging_dir {
            config = config.with_staging_dir(dir);
        }
        config
    }
}

impl Settings {
    /// Load the settings file. A missing file yields the defaults.
    pub fn load() -> io::Result<Self> {
        Self::load_from(&settings_path())
    }

    pub fn load_from(path: &Path) -> io::Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e),
        };
        let settings: Self = toml::from_str(&contents)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        for name in settings.consoles.keys() {
            if name.parse::<Console>().is_err() {
                log::warn!("settings.toml: [consoles.{}] does not match any console", name);
            }
        }
        Ok(settings)
    }

    /// Override for `console`, looked up by any of its names.
    pub fn console_override(&self, console: Console) -> Option<&ConsoleOverride> {
        self.consoles
            .iter()
            .find(|(name, _)| name.parse::<Console>().ok() == Some(console))
            .map(|(_, o)| o)
    }

    /// The run configuration for `console` inside `repository`, with any override applied.
    pub fn console_config(&self, console: Console, repository: &Path) -> ConsoleConfig {
        let config = console.config(repository);
        match self.console_override(console) {
            Some(o) => o.apply(config, repository),
            None => config,
        }
    }

    /// Resolve the repository path using a priority chain:
    ///
    /// 1. CLI override (if `Some`)
    /// 2. Saved `library.repository` in `settings.toml`
    /// 3. Current working directory
    pub fn resolve_repository(&self, cli_override: Option<PathBuf>) -> PathBuf {
        if let Some(p) = cli_override {
            return p;
        }
        if let Some(p) = self
            .library
            .repository
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
        {
            return p.clone();
        }
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

/// Save (or clear) the repository path in `settings.toml`.
pub fn save_repository(path: Option<&Path>) -> io::Result<()> {
    save_repository_to(&settings_path(), path)
}

/// Save (or clear) `library.repository` in the settings file at `settings`.
///
/// Uses `toml::Value` for a surgical update so `[consoles.*]` tables and
/// anything else in the file are preserved.
pub fn save_repository_to(settings: &Path, path: Option<&Path>) -> io::Result<()> {
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(settings) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    // Ensure [library] table exists
    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let library = table
        .entry("library")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let lib_table = library
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[library] is not a table"))?;

    match path {
        Some(p) => {
            lib_table.insert(
                "repository".to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            lib_table.remove("repository");
        }
    }

    // Write atomically
    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, settings)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
