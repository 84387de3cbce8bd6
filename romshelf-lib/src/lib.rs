//! Library operations over a console folder: import staged ROMs, audit the
//! catalog, and export catalogued ROMs.

pub mod check;
pub mod error;
pub mod export;
pub mod ingest;
pub mod layout;
pub mod placement;
pub mod progress;
pub mod scanner;
pub mod session;
pub mod settings;

pub use check::{CheckReport, Discrepancy, TitleField, check};
pub use error::{IngestError, ItemIssue};
pub use export::{ExportReport, FailedCopy, export};
pub use ingest::{ImportAction, ImportReport, ImportedItem, ExistingItem, SkippedItem, import, plan_import};
pub use layout::{LayoutKind, LibraryLayout};
pub use placement::{Placement, resolve_destination};
pub use progress::{IngestProgress, LogProgress, SilentProgress};
pub use session::LibrarySession;
pub use settings::Settings;
