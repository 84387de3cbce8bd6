use romshelf_core::ConsoleConfig;
use romshelf_dat::{ExternalMetadataIndex, GameCatalog};

use crate::error::IngestError;
use crate::layout::LibraryLayout;

/// Everything one run reads from disk before it starts: the layout, the
/// catalog and the plugin index.
///
/// A session is built fresh for each run and never mutated afterwards, so a
/// run always sees the catalog as it was on disk when the run began.
pub struct LibrarySession {
    pub config: ConsoleConfig,
    pub layout: LibraryLayout,
    pub catalog: GameCatalog,
    pub index: ExternalMetadataIndex,
}

impl LibrarySession {
    /// Load the catalog and plugin index for `config`.
    pub fn open(config: &ConsoleConfig) -> Result<Self, IngestError> {
        let layout = LibraryLayout::for_console(config);
        let mut catalog = GameCatalog::new();
        let count = catalog.load(&layout.catalog_sources(), &config.extension)?;
        let index =
            ExternalMetadataIndex::load(layout.plugin_dir(), &config.plugin_name, &config.extension)?;

        log::debug!(
            "{}: {} catalogued, {} external identities ({:?} layout)",
            config.name,
            count,
            index.len(),
            layout.kind()
        );

        Ok(Self {
            config: config.clone(),
            layout,
            catalog,
            index,
        })
    }

    /// Open a session whose catalog is loaded but whose plugin index is empty.
    pub fn open_catalog_only(config: &ConsoleConfig) -> Result<Self, IngestError> {
        let layout = LibraryLayout::for_console(config);
        let mut catalog = GameCatalog::new();
        catalog.load(&layout.catalog_sources(), &config.extension)?;
        Ok(Self {
            config: config.clone(),
            layout,
            catalog,
            index: ExternalMetadataIndex::default(),
        })
    }
}
