use super::*;

const SAMPLE_INI: &str = "\u{feff}[OTHER]
1941=WRONG|ABCD1234

[NEOGEO]
; comment
1941=NG001|ABCD1234
Metal Slug=NG002|64e58dc3|1
Metal Slug (Set 2)=NG002|
Orphan=NG999|DEAD
broken line
";

const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<datafile>
  <game name="1941 / 1941 Counter Attack">
    <id>NG001</id>
    <locale lang="EN"><title>1941</title><synopsis>Planes.</synopsis></locale>
    <locale lang="ZHCN"><title>1941 反击战</title></locale>
  </game>
  <game name="Metal Slug">
    <id>NG002</id>
    <region>JPN</region>
    <locale lang="EN"><title>Metal Slug</title></locale>
    <locale lang="ZHCN"><title>合金弹头</title></locale>
  </game>
  <game name="Untitled">
    <id>NG003</id>
    <locale lang="EN"><title>Shock &amp; Awe</title></locale>
  </game>
</datafile>"#;

fn sample_index() -> ExternalMetadataIndex {
    let aliases = AliasTable::parse(SAMPLE_INI.as_bytes(), "NEOGEO").unwrap();
    let titles = TitleTable::parse(SAMPLE_XML.as_bytes()).unwrap();
    ExternalMetadataIndex::new(aliases, &titles, ".zip")
}

#[test]
fn test_alias_table_reads_only_named_section() {
    let table = AliasTable::parse(SAMPLE_INI.as_bytes(), "NEOGEO").unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.identifier_for_title("1941"), Some("NG001"));
    assert_eq!(
        table.identifier_for_fingerprint(Fingerprint::new(0x64E58DC3)),
        Some("NG002")
    );
    // Un-padded fingerprints are normalized
    assert_eq!(
        table.identifier_for_fingerprint(Fingerprint::new(1)),
        Some("NG002")
    );
    assert_eq!(
        table.titles_for("NG002"),
        &["Metal Slug".to_string(), "Metal Slug (Set 2)".to_string()]
    );
    assert!(table.titles_for("NG404").is_empty());
}

#[test]
fn test_alias_table_duplicate_key_last_wins() {
    let ini = "[P]\nGame=ID1|1\nGame=ID2|2\n";
    let table = AliasTable::parse(ini.as_bytes(), "P").unwrap();
    assert_eq!(table.identifier_for_title("Game"), Some("ID2"));
    assert!(table.titles_for("ID1").is_empty());
    assert_eq!(table.titles_for("ID2"), &["Game".to_string()]);
}

#[test]
fn test_title_table_parse() {
    let table = TitleTable::parse(SAMPLE_XML.as_bytes()).unwrap();
    assert_eq!(table.len(), 3);

    let first = table.get("NG001").unwrap();
    assert_eq!(first.name, "1941 / 1941 Counter Attack");
    assert_eq!(first.english, "1941");
    assert_eq!(first.localized, "1941 反击战");

    let third = table.get("NG003").unwrap();
    assert_eq!(third.english, "Shock & Awe");
    assert_eq!(third.localized, "");
}

#[test]
fn test_resolve_by_title_then_fingerprint() {
    let index = sample_index();

    let by_title = index.resolve("1941", Fingerprint::new(0)).unwrap();
    assert_eq!(by_title.identifier, "NG001");
    assert_eq!(by_title.english_title, "1941");
    assert_eq!(by_title.stored_name.as_deref(), Some("1941.zip"));

    let by_fp = index
        .resolve("mslug", Fingerprint::new(0x64E58DC3))
        .unwrap();
    assert_eq!(by_fp.identifier, "NG002");
    assert_eq!(by_fp.localized_title, "合金弹头");
}

#[test]
fn test_title_match_takes_precedence() {
    let index = sample_index();
    // Title says NG002, fingerprint says NG001
    let resolved = index
        .resolve("Metal Slug", Fingerprint::new(0xABCD1234))
        .unwrap();
    assert_eq!(resolved.identifier, "NG002");
}

#[test]
fn test_stored_name_uses_last_alias() {
    let index = sample_index();
    let resolved = index.identity("NG002").unwrap();
    assert_eq!(resolved.stored_name.as_deref(), Some("Metal Slug (Set 2).zip"));
}

#[test]
fn test_identity_without_alias_has_no_stored_name() {
    let index = sample_index();
    let resolved = index.identity("NG003").unwrap();
    assert_eq!(resolved.stored_name, None);
}

#[test]
fn test_unknown_and_orphaned_identities_are_absent() {
    let index = sample_index();
    assert!(index.resolve("Nothing", Fingerprint::new(0x12345678)).is_none());
    // Listed in the alias table but not in the title table
    assert!(index.resolve("Orphan", Fingerprint::new(0xDEAD)).is_none());
    assert!(index.has_alias("Orphan"));
    assert_eq!(index.len(), 3);
}

#[test]
fn test_load_from_plugin_dir() {
    let dir = tempfile::tempdir().unwrap();
    let plugin_dir = dir.path().join("NEOGEO");
    std::fs::create_dir_all(&plugin_dir).unwrap();
    std::fs::write(plugin_dir.join("NEOGEO.ini"), SAMPLE_INI).unwrap();
    std::fs::write(plugin_dir.join("NEOGEO.xml"), SAMPLE_XML).unwrap();

    let index = ExternalMetadataIndex::load(dir.path(), "NEOGEO", "zip").unwrap();
    assert_eq!(index.len(), 3);
    assert!(index.resolve("1941", Fingerprint::new(0)).is_some());
}

#[test]
fn test_load_missing_documents_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let index = ExternalMetadataIndex::load(dir.path(), "NEOPOCKET", "ngc").unwrap();
    assert!(index.is_empty());
    assert!(index.resolve("Anything", Fingerprint::new(1)).is_none());
}

#[test]
fn test_load_malformed_title_table_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let plugin_dir = dir.path().join("NEOGEO");
    std::fs::create_dir_all(&plugin_dir).unwrap();
    std::fs::write(plugin_dir.join("NEOGEO.xml"), "<datafile><game></datafile>").unwrap();

    assert!(ExternalMetadataIndex::load(dir.path(), "NEOGEO", "zip").is_err());
}
