//! Staging folder scanner.

use std::path::{Path, PathBuf};

use romshelf_core::ConsoleConfig;

/// List the files in `folder` that are import candidates for `config`.
///
/// Only regular files directly inside the folder are considered (no
/// recursion). Files are matched on the console's extension, case-insensitively,
/// minus the console's exclusion rule, and returned sorted by path so runs
/// are deterministic.
pub fn scan_staging(folder: &Path, config: &ConsoleConfig) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(folder)?
        .flatten()
        .map(|e| e.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| {
                    if !config.has_rom_extension(name) {
                        return false;
                    }
                    if config.exclusion.excludes(name) {
                        log::debug!("Skipping excluded file {}", name);
                        return false;
                    }
                    true
                })
        })
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use romshelf_core::Console;

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["mslug.zip", "1941.ZIP", "neogeo.zip", "readme.txt", "kof98.7z"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.zip")).unwrap();

        let config = Console::Mvs.config(dir.path());
        let files = scan_staging(dir.path(), &config).unwrap();
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["1941.ZIP", "mslug.zip"]);
    }

    #[test]
    fn test_bios_is_kept_for_other_consoles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("neogeo.zip"), b"x").unwrap();
        let config = Console::Arcade.config(dir.path());
        assert_eq!(scan_staging(dir.path(), &config).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_folder_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Console::Mvs.config(dir.path());
        assert!(scan_staging(&dir.path().join("nope"), &config).is_err());
    }
}
