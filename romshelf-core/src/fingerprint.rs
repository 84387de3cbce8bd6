//! Content fingerprints: CRC-32 over a file's raw bytes.
//!
//! Two files with the same fingerprint are treated as the same content.
//! CRC-32 collisions are possible in principle; the library accepts that risk
//! and never compares bytes beyond the checksum.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Serialize, Serializer};

const CHUNK_SIZE: usize = 64 * 1024; // 64 KB

/// A CRC-32 (IEEE) content fingerprint.
///
/// The canonical text form is 8 uppercase hex digits, left-padded with `0`
/// (e.g. `"0000ABCD"`). Parsing is lenient: un-padded and lowercase input is
/// accepted, since older catalog documents stored the value without padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u32);

impl Fingerprint {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Fingerprint of an in-memory buffer.
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(crc32fast::hash(data))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error returned when a string is not a valid fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fingerprint: '{0}'")]
pub struct FingerprintParseError(pub String);

impl FromStr for Fingerprint {
    type Err = FingerprintParseError;

    /// Parse 1 to 8 hex digits, case-insensitive, with surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.len() > 8
            || !trimmed.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(FingerprintParseError(s.to_string()));
        }
        u32::from_str_radix(trimmed, 16)
            .map(Self)
            .map_err(|_| FingerprintParseError(s.to_string()))
    }
}

/// Compute the fingerprint of everything a reader yields, streaming in 64KB chunks.
pub fn hash_reader<R: Read>(reader: &mut R) -> io::Result<Fingerprint> {
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(Fingerprint(hasher.finalize()))
}

/// Compute the fingerprint of a file on disk.
///
/// Callers are expected to check that the file exists first; a missing or
/// unreadable file surfaces as the underlying I/O error.
pub fn hash_file(path: &Path) -> io::Result<Fingerprint> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    hash_reader(&mut reader)
}
