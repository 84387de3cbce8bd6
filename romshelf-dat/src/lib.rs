pub mod catalog;
pub mod error;
pub mod export_plan;
pub mod manifest;
pub mod plugin;

pub use catalog::{CatalogEntry, CatalogSource, GameCatalog, parse_catalog, parse_catalog_file};
pub use error::DatError;
pub use export_plan::{ExportPlan, PlannedGame};
pub use manifest::{render_game_list, replace_manifest, write_game_list};
pub use plugin::{AliasTable, ExternalMetadataIndex, IdentityTitles, ResolvedIdentity, TitleTable};
