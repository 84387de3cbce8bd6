use std::io::BufRead;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use romshelf_core::Fingerprint;

use crate::error::DatError;

/// A copy list: which catalogued ROMs go where, under which names.
///
/// Document shape:
///
/// ```xml
/// <Export>
///   <Game crc32="ABCD1234" rom="1941 反击战"/>
///   <Folder name="射击">
///     <Game crc32="64E58DC3" rom="合金弹头"/>
///   </Folder>
/// </Export>
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportPlan {
    /// Every folder in document order, as a path relative to the destination.
    pub folders: Vec<PathBuf>,
    pub games: Vec<PlannedGame>,
}

/// One ROM to copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedGame {
    pub fingerprint: Fingerprint,
    /// Target file name without extension.
    pub rom: String,
    /// Folder relative to the destination; empty for the destination itself.
    pub folder: PathBuf,
}

impl ExportPlan {
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, DatError> {
        let mut xml = Reader::from_reader(reader);
        xml.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut plan = Self::default();
        let mut stack: Vec<String> = Vec::new();

        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.name().as_ref() {
                    b"Folder" => {
                        stack.push(folder_name(e)?);
                        plan.folders.push(stack.iter().collect());
                    }
                    b"Game" => plan.push_game(e, &stack)?,
                    _ => {}
                },
                Event::Empty(ref e) => match e.name().as_ref() {
                    b"Folder" => {
                        let mut path: PathBuf = stack.iter().collect();
                        path.push(folder_name(e)?);
                        plan.folders.push(path);
                    }
                    b"Game" => plan.push_game(e, &stack)?,
                    _ => {}
                },
                Event::End(ref e) => {
                    if e.name().as_ref() == b"Folder" {
                        stack.pop();
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(plan)
    }

    pub fn parse_file(path: &Path) -> Result<Self, DatError> {
        let file = std::fs::File::open(path)?;
        Self::parse(std::io::BufReader::new(file))
    }

    fn push_game(&mut self, e: &BytesStart<'_>, stack: &[String]) -> Result<(), DatError> {
        let mut crc = None;
        let mut rom = None;
        for attr in e.attributes() {
            let attr = attr?;
            match attr.key.as_ref() {
                b"crc32" => crc = Some(attr.unescape_value()?.into_owned()),
                b"rom" => rom = Some(attr.unescape_value()?.into_owned()),
                _ => {}
            }
        }

        let (Some(crc), Some(rom)) = (crc, rom) else {
            return Err(DatError::invalid_document(
                "Export plan <Game> needs both crc32 and rom",
            ));
        };
        let fingerprint = crc
            .parse()
            .map_err(|e| DatError::invalid_document(format!("Export plan: {e}")))?;
        let rom = path_component("rom name", rom)?;

        self.games.push(PlannedGame {
            fingerprint,
            rom,
            folder: stack.iter().collect(),
        });
        Ok(())
    }
}

fn folder_name(e: &BytesStart<'_>) -> Result<String, DatError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"name" {
            return path_component("folder name", attr.unescape_value()?.into_owned());
        }
    }
    Err(DatError::invalid_document("Export plan <Folder> without name"))
}

/// Names from a plan become single path components under the destination.
fn path_component(kind: &str, name: String) -> Result<String, DatError> {
    if name.is_empty() || name.contains(['/', '\\']) || name == ".." || name == "." {
        return Err(DatError::invalid_document(format!(
            "Invalid {kind} in export plan: '{name}'"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PLAN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Export>
  <Game crc32="abcd1234" rom="1941 反击战"/>
  <Folder name="射击">
    <Game crc32="64E58DC3" rom="合金弹头"/>
    <Folder name="双打">
      <Game crc32="1" rom="Twin &amp; Co"/>
    </Folder>
    <Folder name="空"/>
  </Folder>
</Export>"#;

    #[test]
    fn test_parse_nested_plan() {
        let plan = ExportPlan::parse(SAMPLE_PLAN.as_bytes()).unwrap();
        assert_eq!(plan.games.len(), 3);

        assert_eq!(plan.games[0].fingerprint, Fingerprint::new(0xABCD1234));
        assert_eq!(plan.games[0].folder, PathBuf::new());

        assert_eq!(plan.games[1].rom, "合金弹头");
        assert_eq!(plan.games[1].folder, PathBuf::from("射击"));

        assert_eq!(plan.games[2].fingerprint.to_string(), "00000001");
        assert_eq!(plan.games[2].rom, "Twin & Co");
        assert_eq!(plan.games[2].folder, Path::new("射击").join("双打"));

        assert_eq!(
            plan.folders,
            vec![
                PathBuf::from("射击"),
                Path::new("射击").join("双打"),
                Path::new("射击").join("空"),
            ]
        );
    }

    #[test]
    fn test_game_without_rom_is_error() {
        let xml = r#"<Export><Game crc32="1"/></Export>"#;
        assert!(ExportPlan::parse(xml.as_bytes()).is_err());
    }

    #[test]
    fn test_bad_fingerprint_is_error() {
        let xml = r#"<Export><Game crc32="nope" rom="x"/></Export>"#;
        assert!(ExportPlan::parse(xml.as_bytes()).is_err());
    }

    #[test]
    fn test_folder_escaping_destination_is_error() {
        let xml = r#"<Export><Folder name=".."><Game crc32="1" rom="x"/></Folder></Export>"#;
        assert!(ExportPlan::parse(xml.as_bytes()).is_err());
    }

    #[test]
    fn test_rom_escaping_destination_is_error() {
        for rom in ["../escaped", "sub/name", "sub\\name", "..", ""] {
            let xml = format!(r#"<Export><Game crc32="1" rom="{rom}"/></Export>"#);
            let err = ExportPlan::parse(xml.as_bytes()).unwrap_err();
            assert!(
                matches!(err, DatError::InvalidDocument(_)),
                "{rom}: {err:?}"
            );
        }
    }
}
