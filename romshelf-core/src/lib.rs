//! Core types shared by every romshelf crate: content fingerprints, catalog
//! records and console configuration.

pub mod console;
pub mod fingerprint;
pub mod record;

pub use console::{Console, ConsoleConfig, ConsoleParseError, ExclusionRule, normalize_extension};
pub use fingerprint::{Fingerprint, FingerprintParseError, hash_file, hash_reader};
pub use record::{GameRecord, language_from_title, stem_of};
