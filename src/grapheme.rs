use unicode_segmentation::UnicodeSegmentation;

/// Lowercase `text` and return it if it is exactly one extended grapheme cluster.
///
/// Case mapping uses the Unicode default rules, so the result never depends on
/// the process locale. Combining sequences and flag pairs count as a single unit.
pub fn single_grapheme_or_none(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    let lowered = text.to_lowercase();
    let mut graphemes = lowered.graphemes(true);
    match (graphemes.next(), graphemes.next()) {
        (Some(_), None) => Some(lowered),
        _ => None,
    }
}

/// Split a word into its user-perceived characters
pub fn graphemes(word: &str) -> impl Iterator<Item = &str> {
    word.graphemes(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_letter_is_lowercased() {
        assert_eq!(single_grapheme_or_none("A"), Some("a".to_string()));
        assert_eq!(single_grapheme_or_none("z"), Some("z".to_string()));
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(single_grapheme_or_none(""), None);
    }

    #[test]
    fn test_multiple_letters_rejected() {
        assert_eq!(single_grapheme_or_none("ab"), None);
        assert_eq!(single_grapheme_or_none("long"), None);
        assert_eq!(single_grapheme_or_none("a "), None);
    }

    #[test]
    fn test_polish_letters() {
        assert_eq!(single_grapheme_or_none("Ł"), Some("ł".to_string()));
        assert_eq!(single_grapheme_or_none("ó"), Some("ó".to_string()));
    }

    #[test]
    fn test_combining_sequence_is_one_unit() {
        // 'e' followed by U+0301 COMBINING ACUTE ACCENT
        let decomposed = "e\u{301}";
        assert_eq!(decomposed.chars().count(), 2);
        assert_eq!(single_grapheme_or_none(decomposed), Some(decomposed.to_string()));
    }

    #[test]
    fn test_flag_is_one_unit() {
        let flag = "\u{1F1F5}\u{1F1F1}";
        assert_eq!(single_grapheme_or_none(flag), Some(flag.to_string()));
        assert_eq!(single_grapheme_or_none("\u{1F1F5}\u{1F1F1}\u{1F1E9}\u{1F1EA}"), None);
    }

    #[test]
    fn test_graphemes_split() {
        let parts: Vec<&str> = graphemes("koło").collect();
        assert_eq!(parts, vec!["k", "o", "ł", "o"]);

        let parts: Vec<&str> = graphemes("cafe\u{301}").collect();
        assert_eq!(parts, vec!["c", "a", "f", "e\u{301}"]);
    }
}
