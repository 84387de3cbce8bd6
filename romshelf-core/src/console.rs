use std::path::{Path, PathBuf};

/// Built-in console presets.
///
/// Each preset bundles the settings one console folder needs: where it lives
/// under the repository, which files count as ROMs, which frontend plugin
/// holds its metadata, and whether imports require a known identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Console {
    /// Neo Geo MVS cartridges (`.zip` sets, `roms/roms.xml` catalog).
    Mvs,
    /// Older Neo Geo arcade library using the legacy `roms/all.xml` catalog.
    Arcade,
    /// Neo Geo Pocket Color.
    Ngpc,
    /// Neo Geo Pocket (monochrome).
    Pocket,
}

/// All console variants in registration order.
const ALL_CONSOLES: &[Console] = &[
    Console::Mvs,
    Console::Arcade,
    Console::Ngpc,
    Console::Pocket,
];

impl Console {
    /// Canonical short name used for CLI arguments and settings keys.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Mvs => "mvs",
            Self::Arcade => "arcade",
            Self::Ngpc => "ngpc",
            Self::Pocket => "pocket",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mvs => "Neo Geo MVS",
            Self::Arcade => "Neo Geo Arcade (legacy catalog)",
            Self::Ngpc => "Neo Geo Pocket Color",
            Self::Pocket => "Neo Geo Pocket",
        }
    }

    /// Folder name under the repository root.
    pub fn folder(&self) -> &'static str {
        self.short_name()
    }

    /// ROM file extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mvs | Self::Arcade => "zip",
            Self::Ngpc => "ngc",
            Self::Pocket => "ngp",
        }
    }

    /// Name of the frontend plugin whose data describes this console.
    pub fn plugin_name(&self) -> &'static str {
        match self {
            Self::Mvs | Self::Arcade => "NEOGEO",
            Self::Ngpc | Self::Pocket => "NEOPOCKET",
        }
    }

    /// Whether a new ROM must resolve to a known external identity to be imported.
    pub fn strict_identity(&self) -> bool {
        !matches!(self, Self::Arcade)
    }

    pub fn exclusion(&self) -> ExclusionRule {
        match self {
            Self::Mvs => ExclusionRule::NeoGeoBios,
            _ => ExclusionRule::None,
        }
    }

    /// All recognized names for this console (lowercase).
    /// The first entry is always the canonical `short_name()`.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Mvs => &["mvs", "neogeo", "neo geo", "neo-geo"],
            Self::Arcade => &["arcade"],
            Self::Ngpc => &["ngpc", "ngc", "neo geo pocket color", "neopocket color"],
            Self::Pocket => &["pocket", "ngp", "neo geo pocket", "neopocket"],
        }
    }

    pub fn all() -> &'static [Console] {
        ALL_CONSOLES
    }

    /// Build the run configuration for this console inside `repository`.
    pub fn config(&self, repository: &Path) -> ConsoleConfig {
        ConsoleConfig {
            name: self.short_name().to_string(),
            root: repository.join(self.folder()),
            extension: self.extension().to_string(),
            plugin_name: self.plugin_name().to_string(),
            strict_identity: self.strict_identity(),
            exclusion: self.exclusion(),
            plugin_dir: None,
            staging_dir: None,
        }
    }
}

impl std::fmt::Display for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `Console`.
#[derive(Debug, Clone)]
pub struct ConsoleParseError(pub String);

impl std::fmt::Display for ConsoleParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown console: '{}'", self.0)
    }
}

impl std::error::Error for ConsoleParseError {}

impl std::str::FromStr for Console {
    type Err = ConsoleParseError;

    /// Parse a console from any recognized name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_CONSOLES
            .iter()
            .copied()
            .find(|console| console.aliases().contains(&lower.as_str()))
            .ok_or_else(|| ConsoleParseError(s.to_string()))
    }
}

/// Files in a staging folder that must never be imported even though their
/// extension matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExclusionRule {
    #[default]
    None,
    /// The Neo Geo system BIOS set, `neogeo.zip`, lives next to the games
    /// but is not a game.
    NeoGeoBios,
    /// Explicit file names (compared case-insensitively).
    FileNames(Vec<String>),
}

impl ExclusionRule {
    pub fn excludes(&self, file_name: &str) -> bool {
        match self {
            Self::None => false,
            Self::NeoGeoBios => file_name.eq_ignore_ascii_case("neogeo.zip"),
            Self::FileNames(names) => names.iter().any(|n| n.eq_ignore_ascii_case(file_name)),
        }
    }
}

/// Everything one pipeline run needs to know about a console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Short name used in log lines.
    pub name: String,
    /// Console folder (holds `roms/`, the manifests and the plugin data).
    pub root: PathBuf,
    /// ROM extension without the leading dot.
    pub extension: String,
    pub plugin_name: String,
    pub strict_identity: bool,
    pub exclusion: ExclusionRule,
    /// Override for the plugin data folder (default `<root>/wiiflow/plugins_data`).
    pub plugin_dir: Option<PathBuf>,
    /// Override for the staging folder (default `<root>/roms_import`).
    pub staging_dir: Option<PathBuf>,
}

impl ConsoleConfig {
    /// Set the extension, accepting it with or without a leading dot.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = normalize_extension(extension);
        self
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    pub fn with_plugin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plugin_dir = Some(dir.into());
        self
    }

    /// `"<stem>.<ext>"`
    pub fn rom_file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension)
    }

    /// True if `name` already ends with this console's extension (case-insensitive).
    pub fn has_rom_extension(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }

    /// True for staging files that are candidates for import.
    pub fn matches_rom(&self, file_name: &str) -> bool {
        self.has_rom_extension(file_name) && !self.exclusion.excludes(file_name)
    }
}

/// Strip a leading dot and lowercase an extension.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
