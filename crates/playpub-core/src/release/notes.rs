//! Localized "what's new" release notes
//!
//! Notes live in a directory as one file per locale, named
//! `whatsnew-<locale>` (e.g. `whatsnew-en-US`, `whatsnew-fr`).

use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::{PublishError, Result};

/// Locale tag to release note text
pub type LocaleNotesMap = BTreeMap<String, String>;

/// File name prefix of a release notes file
pub const WHATS_NEW_PREFIX: &str = "whatsnew-";

// BCP-47 language tag, https://tools.ietf.org/html/bcp47#section-2.1
const LOCALE_PATTERN: &str = r"^whatsnew-(?P<locale>([0-9a-zA-Z].*(-|$))+)";

/// Read every `whatsnew-<locale>` file in `dir` into a locale map.
///
/// A directory without matching files yields an empty map. Failing to list
/// the directory or to read any matched file aborts with an IO error and no
/// partial result.
pub fn read_localized_notes(dir: &Path) -> Result<LocaleNotesMap> {
    std::fs::read_dir(dir).map_err(|e| {
        PublishError::io(
            format!("failed to list release notes directory ({})", dir.display()),
            e,
        )
    })?;

    let locale_re = Regex::new(LOCALE_PATTERN)
        .map_err(|e| PublishError::invalid_config(format!("invalid locale pattern: {}", e)))?;

    let pattern = format!(
        "{}/{}*",
        glob::Pattern::escape(&dir.to_string_lossy()),
        WHATS_NEW_PREFIX
    );
    let paths = glob::glob(&pattern).map_err(|e| {
        PublishError::invalid_config(format!("invalid release notes pattern {}: {}", pattern, e))
    })?;

    let mut notes = LocaleNotesMap::new();
    for entry in paths {
        let path = entry.map_err(|e| {
            let context = format!("failed to read release notes entry ({})", e.path().display());
            PublishError::io(context, e.into())
        })?;

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(locale) = locale_re.captures(file_name).and_then(|c| c.name("locale")) else {
            continue;
        };

        let content = std::fs::read_to_string(&path).map_err(|e| {
            PublishError::io(
                format!("failed to read release notes file ({})", path.display()),
                e,
            )
        })?;
        notes.insert(locale.as_str().to_string(), content);
    }

    if notes.is_empty() {
        debug!("No recent changes found");
    } else {
        debug!("Found the following recent changes:");
        for (language, text) in &notes {
            debug!(language = %language, "Content: {}", text);
        }
    }

    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_locale_files_only() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("whatsnew-en-US"), "Bug fixes").unwrap();
        std::fs::write(temp.path().join("whatsnew-fr"), "Corrections").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let notes = read_localized_notes(temp.path()).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes["en-US"], "Bug fixes");
        assert_eq!(notes["fr"], "Corrections");
    }

    #[test]
    fn test_empty_directory_gives_empty_map() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("README.md"), "no notes").unwrap();

        let notes = read_localized_notes(temp.path()).unwrap();
        assert!(notes.is_empty());
    }

    #[test]
    fn test_multi_segment_tags_kept_whole() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("whatsnew-zh-Hant-TW"), "更新").unwrap();

        let notes = read_localized_notes(temp.path()).unwrap();
        assert_eq!(notes["zh-Hant-TW"], "更新");
    }

    #[test]
    fn test_prefix_without_locale_is_skipped() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("whatsnew-"), "nothing").unwrap();
        std::fs::write(temp.path().join("whatsnew-_x"), "nothing").unwrap();
        std::fs::write(temp.path().join("whatsnew-de"), "Neu").unwrap();

        let notes = read_localized_notes(temp.path()).unwrap();
        assert_eq!(notes.keys().collect::<Vec<_>>(), vec!["de"]);
    }

    #[test]
    fn test_directory_name_does_not_leak_into_locale() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("whatsnew-notes");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("whatsnew-it"), "Novità").unwrap();

        let notes = read_localized_notes(&dir).unwrap();
        assert_eq!(notes.keys().collect::<Vec<_>>(), vec!["it"]);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = read_localized_notes(&temp.path().join("absent")).unwrap_err();
        assert!(matches!(err, PublishError::Io { .. }));
    }

    #[test]
    fn test_unreadable_match_aborts() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("whatsnew-en-US"), "ok").unwrap();
        // A directory matches the glob but cannot be read as text
        std::fs::create_dir(temp.path().join("whatsnew-fr")).unwrap();

        let err = read_localized_notes(temp.path()).unwrap_err();
        assert!(matches!(err, PublishError::Io { .. }));
    }
}
