mod common;

use common::{Fixture, catalog_xml};
use romshelf_core::{Console, Fingerprint};
use romshelf_lib::{IngestError, SilentProgress, export};
use romshelf_dat::DatError;

fn library() -> (Fixture, Fingerprint, Fingerprint) {
    let fx = Fixture::new(Console::Ngpc);
    let sonic = Fingerprint::of_bytes(b"sonic");
    let puzzle = Fingerprint::of_bytes(b"puzzle");
    fx.write("roms/roms.xml", catalog_xml(&[
        (sonic, 5, "Sonic.ngc", "Sonic", "索尼克"),
        (puzzle, 6, "Puzzle Link.ngc", "Puzzle Link", "连连看"),
    ])
    .as_bytes());
    fx.write("roms/Sonic.ngc", b"sonic");
    fx.write(&format!("roms/Puzzle Link/{}.ngc", puzzle), b"puzzle");
    (fx, sonic, puzzle)
}

#[test]
fn plan_is_copied_with_localized_names() {
    let (fx, sonic, puzzle) = library();
    let plan = fx.write(
        "export.xml",
        format!(
            r#"<Export>
  <Game crc32="{sonic}" rom="索尼克"/>
  <Folder name="益智">
    <Game crc32="{puzzle}" rom="连连看"/>
    <Game crc32="DEADBEEF" rom="不存在"/>
  </Folder>
  <Folder name="空"/>
</Export>"#
        )
        .as_bytes(),
    );
    let dest = fx.dir.path().join("sd").join("roms");

    let report = export(&fx.config, &plan, &dest, &SilentProgress).unwrap();

    assert_eq!(report.copied.len(), 2);
    assert_eq!(std::fs::read(dest.join("索尼克.ngc")).unwrap(), b"sonic");
    assert_eq!(
        std::fs::read(dest.join("益智").join("连连看.ngc")).unwrap(),
        b"puzzle"
    );
    assert!(dest.join("空").is_dir());
    assert_eq!(report.missing, vec![Fingerprint::new(0xDEADBEEF)]);
    // The library is untouched
    assert!(fx.path("roms/Sonic.ngc").exists());
}

#[test]
fn existing_files_are_not_overwritten() {
    let (fx, sonic, _) = library();
    let plan = fx.write(
        "export.xml",
        format!(r#"<Export><Game crc32="{sonic}" rom="Sonic"/></Export>"#).as_bytes(),
    );
    let dest = fx.dir.path().join("sd");
    std::fs::create_dir_all(&dest).unwrap();
    std::fs::write(dest.join("Sonic.ngc"), b"keep me").unwrap();

    let report = export(&fx.config, &plan, &dest, &SilentProgress).unwrap();

    assert!(report.copied.is_empty());
    assert_eq!(report.skipped_existing, vec![dest.join("Sonic.ngc")]);
    assert_eq!(std::fs::read(dest.join("Sonic.ngc")).unwrap(), b"keep me");
}

#[test]
fn missing_plan_is_an_error() {
    let (fx, _, _) = library();
    let dest = fx.dir.path().join("sd");

    let err = export(&fx.config, &fx.path("nope.xml"), &dest, &SilentProgress).unwrap_err();

    assert!(matches!(err, IngestError::MissingFile(_)));
    assert!(!dest.exists());
}

#[test]
fn failed_copy_does_not_stop_the_export() {
    let (fx, sonic, puzzle) = library();
    let dest = fx.dir.path().join("sd");
    std::fs::create_dir_all(&dest).unwrap();
    // A file where the plan wants a folder
    std::fs::write(dest.join("blocker"), b"not a folder").unwrap();
    let plan = fx.write(
        "export.xml",
        format!(
            r#"<Export>
  <Folder name="blocker"><Game crc32="{puzzle}" rom="Puzzle"/></Folder>
  <Game crc32="{sonic}" rom="Sonic"/>
</Export>"#
        )
        .as_bytes(),
    );

    let report = export(&fx.config, &plan, &dest, &SilentProgress).unwrap();

    assert_eq!(report.copied, vec![dest.join("Sonic.ngc")]);
    assert!(
        report
            .failed
            .iter()
            .any(|f| f.path == dest.join("blocker").join("Puzzle.ngc"))
    );
    assert_eq!(std::fs::read(dest.join("Sonic.ngc")).unwrap(), b"sonic");
}

#[test]
fn rom_name_cannot_leave_the_destination() {
    let (fx, sonic, _) = library();
    let dest = fx.dir.path().join("sd");
    let plan = fx.write(
        "export.xml",
        format!(r#"<Export><Game crc32="{sonic}" rom="../escaped"/></Export>"#).as_bytes(),
    );

    let err = export(&fx.config, &plan, &dest, &SilentProgress).unwrap_err();

    assert!(matches!(err, IngestError::Dat(DatError::InvalidDocument(_))));
    assert!(!fx.dir.path().join("escaped.ngc").exists());
    assert!(!dest.exists());
}
