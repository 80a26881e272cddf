//! Comparison-safe text normalization for free-text filtering.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize `text` for substring matching.
///
/// Performs:
/// - Unicode NFKD (compatibility) decomposition, so no-break spaces,
///   ligatures and full-width forms match their plain spellings
/// - Lowercase conversion
/// - Typographic punctuation folded to ASCII (curly quotes, dashes,
///   ellipsis, guillemets)
///
/// Both sides of a comparison must go through this function.
pub fn normalize_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.nfkd().flat_map(char::to_lowercase) {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{201b}' => out.push('\''),
            '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{201f}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{ab}' => out.push_str("<<"),
            '\u{bb}' => out.push_str(">>"),
            other => out.push(other),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_decomposes() {
        assert_eq!(normalize_string("ABC"), "abc");
        assert_eq!(normalize_string("Caf\u{e9}"), "cafe\u{301}");
        // Precomposed and decomposed input normalize identically.
        assert_eq!(normalize_string("Caf\u{e9}"), normalize_string("Cafe\u{301}"));
    }

    #[test]
    fn compatibility_forms_match_plain_text() {
        assert!(normalize_string("Tabs\u{a0}and spaces").contains(&normalize_string("tabs and")));
        assert_eq!(normalize_string("\u{fb01}sh"), "fish");
        assert_eq!(normalize_string("\u{ff37}ork"), "work");
        assert_eq!(normalize_string("H\u{2082}O"), "h2o");
    }

    #[test]
    fn folds_smart_punctuation() {
        assert_eq!(normalize_string("\u{2018}a\u{2019}"), "'a'");
        assert_eq!(normalize_string("\u{201c}a\u{201d}"), "\"a\"");
        assert_eq!(normalize_string("a\u{2013}b\u{2014}c"), "a-b-c");
        assert_eq!(normalize_string("wait\u{2026}"), "wait...");
        assert_eq!(normalize_string("\u{ab}oui\u{bb}"), "<<oui>>");
    }

    #[test]
    fn smart_and_plain_quotes_match() {
        let smart = normalize_string("Caf\u{e9}'s \u{201c}smart\u{201d} quote\u{2026}");
        let plain = normalize_string("cafe's \"smart\" quote...");

        assert!(smart.contains("'s \"smart\" quote..."));
        assert!(plain.contains("'s \"smart\" quote..."));
        assert!(smart.contains(&normalize_string("\u{201c}SMART\u{201d} quote...")));
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_string("\u{c9}T\u{c9} \u{2014} \u{ab}Fin\u{bb}\u{2026}");
        assert_eq!(normalize_string(&once), once);
    }
}
