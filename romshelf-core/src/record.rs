use std::path::Path;

use serde::Serialize;

use crate::fingerprint::Fingerprint;

/// Title suffix marking a Chinese-translated ROM hack (e.g. `"Metal Slug (中)"`).
pub const CHINESE_MARKER: &str = "(中)";

/// Language tag written for titles carrying [`CHINESE_MARKER`].
pub const CHINESE_LANGUAGE: &str = "chinese";

/// One catalogued ROM file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub fingerprint: Fingerprint,
    pub byte_size: u64,
    /// File name including extension, e.g. `"1941.zip"`.
    pub stored_name: String,
    pub english_title: String,
    pub localized_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl GameRecord {
    /// The stored name without its extension (the title used for folder placement).
    pub fn title(&self) -> &str {
        stem_of(&self.stored_name)
    }
}

/// File name minus its final extension. Names without a dot are returned unchanged.
pub fn stem_of(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

/// Infer the language tag from a title's trailing marker.
pub fn language_from_title(title: &str) -> Option<String> {
    if title.ends_with(CHINESE_MARKER) && title.len() > CHINESE_MARKER.len() {
        Some(CHINESE_LANGUAGE.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_of() {
        assert_eq!(stem_of("1941.zip"), "1941");
        assert_eq!(stem_of("Metal Slug 2.ngc"), "Metal Slug 2");
        assert_eq!(stem_of("noext"), "noext");
        assert_eq!(stem_of("a.b.zip"), "a.b");
    }

    #[test]
    fn test_language_marker() {
        assert_eq!(
            language_from_title("King of Fighters (中)").as_deref(),
            Some("chinese")
        );
        assert_eq!(language_from_title("King of Fighters"), None);
        // The bare marker is not a title
        assert_eq!(language_from_title("(中)"), None);
    }

    #[test]
    fn test_record_title() {
        let record = GameRecord {
            fingerprint: Fingerprint::new(1),
            byte_size: 10,
            stored_name: "1941.zip".to_string(),
            english_title: "1941".to_string(),
            localized_title: "1941".to_string(),
            language: None,
        };
        assert_eq!(record.title(), "1941");
    }
}
