#![allow(dead_code)]

use std::path::{Path, PathBuf};

use romshelf_core::{Console, ConsoleConfig, Fingerprint};
use romshelf_dat::{parse_catalog_file, write_game_list};
use tempfile::TempDir;

/// A throwaway repository holding one console folder.
pub struct Fixture {
    pub dir: TempDir,
    pub config: ConsoleConfig,
}

impl Fixture {
    pub fn new(console: Console) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = console.config(dir.path());
        std::fs::create_dir_all(&config.root).unwrap();
        Self { dir, config }
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        rel.split('/').fold(self.root().to_path_buf(), |p, part| p.join(part))
    }

    /// Write a file relative to the console folder.
    pub fn write(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Put a file in the staging folder and return its fingerprint.
    pub fn stage(&self, name: &str, contents: &[u8]) -> Fingerprint {
        self.write(&format!("roms_import/{}", name), contents);
        Fingerprint::of_bytes(contents)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.path("roms_import")
    }

    pub fn write_plugin(&self, ini: &str, xml: &str) {
        let plugin = &self.config.plugin_name;
        self.write(
            &format!("wiiflow/plugins_data/{0}/{0}.ini", plugin),
            ini.as_bytes(),
        );
        self.write(
            &format!("wiiflow/plugins_data/{0}/{0}.xml", plugin),
            xml.as_bytes(),
        );
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).unwrap()
    }

    /// Fold `roms_new.xml` into the flat catalog, the way an operator merges it.
    pub fn merge_new_manifest(&self) {
        let catalog = self.path("roms/roms.xml");
        let mut records = if catalog.exists() {
            parse_catalog_file(&catalog).unwrap()
        } else {
            Vec::new()
        };
        records.extend(parse_catalog_file(&self.path("roms_new.xml")).unwrap());
        write_game_list(&catalog, &records).unwrap();
    }

    /// Every file under `rel` with its contents, sorted by relative path.
    pub fn tree(&self, rel: &str) -> Vec<(String, Vec<u8>)> {
        fn walk(base: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
            for entry in std::fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    walk(base, &path, out);
                } else {
                    let rel = path.strip_prefix(base).unwrap().to_string_lossy().into_owned();
                    out.push((rel, std::fs::read(&path).unwrap()));
                }
            }
        }
        let base = self.path(rel);
        let mut out = Vec::new();
        walk(&base, &base, &mut out);
        out.sort();
        out
    }
}

/// A title table with one `<game>` per `(id, en, zhcn)`.
pub fn title_xml(games: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<datafile>\n");
    for (id, en, zhcn) in games {
        xml.push_str(&format!(
            "  <game name=\"{en}\">\n    <id>{id}</id>\n    <locale lang=\"EN\"><title>{en}</title></locale>\n    <locale lang=\"ZHCN\"><title>{zhcn}</title></locale>\n  </game>\n"
        ));
    }
    xml.push_str("</datafile>\n");
    xml
}

/// A catalog document with one `<Game>` per `(fingerprint, bytes, rom, en, zhcn)`.
pub fn catalog_xml(games: &[(Fingerprint, usize, &str, &str, &str)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Game-List>\n");
    for (fp, bytes, rom, en, zhcn) in games {
        xml.push_str(&format!(
            "  <Game crc32=\"{fp}\" bytes=\"{bytes}\" rom=\"{rom}\" en=\"{en}\" zhcn=\"{zhcn}\" />\n"
        ));
    }
    xml.push_str("</Game-List>\n");
    xml
}
