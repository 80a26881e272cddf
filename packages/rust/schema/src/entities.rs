//! HTML character reference decoding.
//!
//! Schema.org feeds are frequently generated from HTML templates, so titles
//! and descriptions arrive with `&amp;`, `&#8217;` and friends still encoded,
//! and now and then with inline markup such as `<em>`.

use scraper::Html;

/// Decode `text` as an HTML fragment and return its text content.
///
/// Every HTML5 named reference is understood, inline tags are dropped, and
/// decoding is a single pass, so `&amp;lt;` becomes `&lt;`, not `<`.
pub fn decode_entities(text: &str) -> String {
    if !text.contains(['&', '<']) {
        return text.to_string();
    }
    Html::parse_fragment(text)
        .root_element()
        .text()
        .collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(decode_entities("Tabs and spaces"), "Tabs and spaces");
        assert_eq!(decode_entities(""), "");
        assert_eq!(decode_entities("AT&T"), "AT&T");
    }

    #[test]
    fn decodes_common_named_references() {
        assert_eq!(decode_entities("Fish &amp; Chips"), "Fish & Chips");
        assert_eq!(
            decode_entities("&ldquo;secret&rdquo; &mdash; Caf&eacute;"),
            "\u{201c}secret\u{201d} \u{2014} Caf\u{e9}"
        );
    }

    #[test]
    fn decodes_the_full_named_table() {
        assert_eq!(
            decode_entities("Espa&ntilde;ol &oacute; &hearts;"),
            "Espa\u{f1}ol \u{f3} \u{2665}"
        );
        assert_eq!(decode_entities("&frac12; cup &times; 2"), "\u{bd} cup \u{d7} 2");
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(decode_entities("it&#8217;s"), "it\u{2019}s");
        assert_eq!(decode_entities("it&#x2019;s"), "it\u{2019}s");
        assert_eq!(decode_entities("wait&#X2026;"), "wait\u{2026}");
        assert_eq!(decode_entities("&#xD800;"), "\u{fffd}");
    }

    #[test]
    fn strips_inline_markup() {
        assert_eq!(decode_entities("Fudgy <em>and</em> rich"), "Fudgy and rich");
        assert_eq!(
            decode_entities("<b>Bold</b> &amp; <i>brave</i>"),
            "Bold & brave"
        );
    }

    #[test]
    fn single_pass_only() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }
}
