//! Writers for `Game-List` documents: run manifests and catalog documents
//! share the same shape.

use std::fs;
use std::io::Write;
use std::path::Path;

use romshelf_core::GameRecord;

use crate::error::DatError;

/// Render records as a `Game-List` document.
///
/// Attribute order is fixed: `crc32 bytes rom en zhcn`, plus `language` when set.
pub fn render_game_list(records: &[GameRecord]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    xml.push_str("<Game-List>\n");

    for record in records {
        xml.push_str("  <Game");
        write_attr(&mut xml, "crc32", &record.fingerprint.to_string());
        write_attr(&mut xml, "bytes", &record.byte_size.to_string());
        write_attr(&mut xml, "rom", &record.stored_name);
        write_attr(&mut xml, "en", &record.english_title);
        write_attr(&mut xml, "zhcn", &record.localized_title);
        if let Some(ref language) = record.language {
            write_attr(&mut xml, "language", language);
        }
        xml.push_str(" />\n");
    }

    xml.push_str("</Game-List>\n");
    xml
}

/// Write records as a `Game-List` document at `path`, replacing any existing file.
pub fn write_game_list(path: &Path, records: &[GameRecord]) -> Result<(), DatError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(render_game_list(records).as_bytes())?;
    Ok(())
}

/// Replace a run manifest.
///
/// Any previous file at `path` is deleted first. Nothing is written when
/// `records` is empty, so a run with nothing to report leaves no manifest behind.
/// Returns whether a manifest was written.
pub fn replace_manifest(path: &Path, records: &[GameRecord]) -> Result<bool, DatError> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    if records.is_empty() {
        return Ok(false);
    }
    write_game_list(path, records)?;
    Ok(true)
}

fn write_attr(xml: &mut String, name: &str, value: &str) {
    xml.push(' ');
    xml.push_str(name);
    xml.push_str("=\"");
    xml.push_str(&escape_xml(value));
    xml.push('"');
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog;
    use romshelf_core::Fingerprint;

    fn record(fp: u32, name: &str, en: &str, zhcn: &str) -> GameRecord {
        GameRecord {
            fingerprint: Fingerprint::new(fp),
            byte_size: 4,
            stored_name: name.to_string(),
            english_title: en.to_string(),
            localized_title: zhcn.to_string(),
            language: None,
        }
    }

    #[test]
    fn test_render_attribute_order() {
        let xml = render_game_list(&[record(0xABCD1234, "1941.zip", "1941", "1941")]);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Game-List>\n"));
        assert!(xml.contains(
            r#"<Game crc32="ABCD1234" bytes="4" rom="1941.zip" en="1941" zhcn="1941" />"#
        ));
        assert!(xml.ends_with("</Game-List>\n"));
    }

    #[test]
    fn test_render_pads_and_escapes() {
        let mut r = record(0xAB, "Tom & Jerry (中).zip", "Tom & \"Jerry\"", "<猫和老鼠>");
        r.language = Some("chinese".to_string());
        let xml = render_game_list(&[r]);
        assert!(xml.contains(r#"crc32="000000AB""#));
        assert!(xml.contains(r#"rom="Tom &amp; Jerry (中).zip""#));
        assert!(xml.contains(r#"en="Tom &amp; &quot;Jerry&quot;""#));
        assert!(xml.contains(r#"zhcn="&lt;猫和老鼠&gt;""#));
        assert!(xml.contains(r#"language="chinese""#));
    }

    #[test]
    fn test_written_list_reads_back() {
        let records = vec![
            record(1, "a.zip", "A & B", "甲"),
            record(2, "b.zip", "B", "乙"),
        ];
        let parsed = parse_catalog(render_game_list(&records).as_bytes()).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_replace_manifest_deletes_stale_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roms_new.xml");

        assert!(replace_manifest(&path, &[record(1, "a.zip", "a", "a")]).unwrap());
        assert!(path.exists());

        assert!(!replace_manifest(&path, &[]).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(escape_xml("a < b"), "a &lt; b");
    }
}
