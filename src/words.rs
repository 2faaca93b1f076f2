use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::WordsError;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Words every new game starts with unless told otherwise
pub const DEFAULT_WORDS: [&str; 6] = ["koło", "drzwi", "drzewo", "powóz", "pole", "słońce"];

/// Largest word file accepted for import
pub const MAX_WORD_FILE_BYTES: u64 = 4096;

/// Word lists shipped with the binary
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WordList {
    Polish,
    English,
    Animals,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BundledList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordList {
    pub fn load(&self) -> Result<BundledList, WordsError> {
        read_bundled(&format!("{self}.json"))
    }
}

fn read_bundled(file_name: &str) -> Result<BundledList, WordsError> {
    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| WordsError::UnknownList(file_name.to_string()))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| WordsError::UnknownList(file_name.to_string()))?;

    Ok(serde_json::from_str(contents)?)
}

/// Trim and lowercase one word so guesses can match it
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Every whitespace-separated word, normalized.
///
/// A line like "ice cream" yields two words, so no word ever needs a
/// space guessed.
pub fn parse_word_list(text: &str) -> Vec<String> {
    text.split_whitespace().map(normalize).collect()
}

#[instrument]
pub fn read_word_file(path: &Path) -> Result<Vec<String>, WordsError> {
    let size = fs::metadata(path)?.len();
    if size > MAX_WORD_FILE_BYTES {
        return Err(WordsError::TooLarge {
            size,
            limit: MAX_WORD_FILE_BYTES,
        });
    }

    let words = parse_word_list(&fs::read_to_string(path)?);
    debug!(count = words.len(), "read word file");
    Ok(words)
}

/// Words for a new game: every file's words, or the bundled `list` when
/// there are no files, plus `DEFAULT_WORDS` if asked for.
pub fn collect_words(
    list: WordList,
    files: &[PathBuf],
    include_defaults: bool,
) -> Result<Vec<String>, WordsError> {
    let mut words = Vec::new();
    if files.is_empty() {
        words.extend(list.load()?.words);
    } else {
        for path in files {
            words.extend(read_word_file(path)?);
        }
    }

    if include_defaults {
        words.extend(DEFAULT_WORDS.iter().map(|w| w.to_string()));
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_words() {
        assert_eq!(DEFAULT_WORDS.len(), 6);
        assert!(DEFAULT_WORDS.contains(&"słońce"));
    }

    #[test]
    fn test_bundled_lists_load() {
        for list in [WordList::Polish, WordList::English, WordList::Animals] {
            let bundled = list.load().unwrap();
            assert_eq!(bundled.name, list.to_string());
            assert_eq!(bundled.size as usize, bundled.words.len());
            assert!(bundled
                .words
                .iter()
                .all(|w| *w == normalize(w) && !w.is_empty()));
        }
    }

    #[test]
    fn test_polish_list_contains_defaults() {
        let bundled = WordList::Polish.load().unwrap();
        for word in DEFAULT_WORDS {
            assert!(bundled.words.iter().any(|w| w == word));
        }
    }

    #[test]
    fn test_unknown_bundled_list() {
        assert_matches!(read_bundled("klingon.json"), Err(WordsError::UnknownList(_)));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Słońce \t"), "słońce");
        assert_eq!(normalize("BOAT"), "boat");
    }

    #[test]
    fn test_parse_word_list_skips_blank_lines() {
        let words = parse_word_list("Apple\n\n  orange  \r\n\t\nBOAT\n");
        assert_eq!(words, vec!["apple", "orange", "boat"]);
    }

    #[test]
    fn test_parse_word_list_splits_phrases() {
        let words = parse_word_list("Ice Cream\nhot\u{00a0}dog\n");
        assert_eq!(words, vec!["ice", "cream", "hot", "dog"]);
        assert!(words.iter().all(|w| !w.chars().any(char::is_whitespace)));
    }

    #[test]
    fn test_read_word_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Horse").unwrap();
        writeln!(file, " house").unwrap();
        writeln!(file, "FIELD ").unwrap();

        let words = read_word_file(file.path()).unwrap();
        assert_eq!(words, vec!["horse", "house", "field"]);
    }

    #[test]
    fn test_read_word_file_too_large() {
        let mut file = NamedTempFile::new().unwrap();
        let line = "a".repeat(99);
        for _ in 0..50 {
            writeln!(file, "{line}").unwrap();
        }

        assert_matches!(
            read_word_file(file.path()),
            Err(WordsError::TooLarge { size: 5000, limit: 4096 })
        );
    }

    #[test]
    fn test_read_missing_word_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            read_word_file(&dir.path().join("missing.txt")),
            Err(WordsError::Io(_))
        );
    }

    #[test]
    fn test_collect_words_from_bundled_list() {
        let words = collect_words(WordList::Animals, &[], false).unwrap();
        assert_eq!(words, WordList::Animals.load().unwrap().words);
    }

    #[test]
    fn test_collect_words_prefers_files() {
        let mut first = NamedTempFile::new().unwrap();
        writeln!(first, "owl").unwrap();
        let mut second = NamedTempFile::new().unwrap();
        writeln!(second, "Fox\n\nowl").unwrap();

        let files = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let words = collect_words(WordList::English, &files, true).unwrap();
        assert_eq!(&words[..3], ["owl", "fox", "owl"]);
        assert_eq!(&words[3..], DEFAULT_WORDS);
    }
}
