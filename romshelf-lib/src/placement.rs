//! Destination rules for new ROMs.
//!
//! A title normally owns one flat file, `<parent>/<title>.<ext>`. Once a second
//! dump of the same title arrives, the title becomes a bucket folder holding
//! every dump under its fingerprint:
//!
//! ```text
//! roms/1941.zip              one dump
//! roms/1941/64E58DC3.zip     several dumps
//! roms/1941/8C733532.zip
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use romshelf_core::{Fingerprint, hash_file};

/// Where a new file goes, and whether an existing flat file has to move first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// No file for this title yet.
    Flat { destination: PathBuf },
    /// The title already has a bucket folder.
    Bucket { destination: PathBuf },
    /// The title has a flat file that must move into a new bucket folder.
    Migrate {
        existing: PathBuf,
        migrated_to: PathBuf,
        destination: PathBuf,
    },
}

impl Placement {
    pub fn destination(&self) -> &Path {
        match self {
            Self::Flat { destination }
            | Self::Bucket { destination }
            | Self::Migrate { destination, .. } => destination,
        }
    }

    /// The file already occupying this placement, if any.
    ///
    /// A flat file with the same fingerprint as the new one counts as
    /// occupying it: migrating it would leave a single dump in a bucket.
    pub fn occupant(&self) -> Option<&Path> {
        match self {
            Self::Migrate {
                existing,
                migrated_to,
                destination,
            } => {
                if migrated_to == destination {
                    Some(existing.as_path())
                } else if destination.exists() {
                    Some(destination.as_path())
                } else {
                    None
                }
            }
            Self::Flat { destination } | Self::Bucket { destination } => {
                destination.exists().then_some(destination.as_path())
            }
        }
    }

    /// True when the new file would land on a file that is already there.
    pub fn collides(&self) -> bool {
        self.occupant().is_some()
    }
}

/// `<fingerprint>.<ext>`
pub fn bucket_file_name(fingerprint: Fingerprint, extension: &str) -> String {
    format!("{}.{}", fingerprint, extension)
}

/// Decide where a file with `fingerprint` titled `title` goes under `parent`.
///
/// Read-only: a flat file that would need migrating is hashed but not moved.
pub fn resolve_destination(
    parent: &Path,
    title: &str,
    fingerprint: Fingerprint,
    extension: &str,
) -> io::Result<Placement> {
    let bucket = parent.join(title);
    if bucket.is_dir() {
        return Ok(Placement::Bucket {
            destination: bucket.join(bucket_file_name(fingerprint, extension)),
        });
    }

    let flat = parent.join(format!("{}.{}", title, extension));
    if flat.is_file() {
        let existing_fp = hash_file(&flat)?;
        return Ok(Placement::Migrate {
            migrated_to: bucket.join(bucket_file_name(existing_fp, extension)),
            existing: flat,
            destination: bucket.join(bucket_file_name(fingerprint, extension)),
        });
    }

    Ok(Placement::Flat { destination: flat })
}

/// Perform the filesystem side of a placement that reorganizes existing files.
///
/// Returns the migrated path when a flat file was moved into its bucket.
pub fn prepare(placement: &Placement) -> io::Result<Option<PathBuf>> {
    match placement {
        Placement::Migrate {
            existing,
            migrated_to,
            ..
        } => {
            if let Some(bucket) = migrated_to.parent() {
                fs::create_dir_all(bucket)?;
            }
            fs::rename(existing, migrated_to)?;
            log::info!(
                "Moved {} to {}",
                existing.display(),
                migrated_to.display()
            );
            Ok(Some(migrated_to.clone()))
        }
        Placement::Flat { .. } | Placement::Bucket { .. } => Ok(None),
    }
}

/// Move `source` to `destination`, creating parent folders first.
///
/// On failure the source stays where it was.
pub fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(source, destination)
}
