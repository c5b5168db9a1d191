//! Emoji-glyph detection: segment text into grapheme clusters and keep the
//! ones the emoji registry recognizes. ZWJ sequences and flags are single
//! clusters, so 👩‍🔬 or 🇺🇾 count once each.

use unicode_segmentation::UnicodeSegmentation;

/// Emoji glyphs found in `text`, in order of appearance, as written
/// (an unqualified glyph keys separately from its qualified form upstream;
/// recognition here accepts both).
pub fn emoji_glyphs(text: &str) -> Vec<&str> {
    text.graphemes(true).filter(|g| is_emoji_glyph(g)).collect()
}

fn is_emoji_glyph(g: &str) -> bool {
    if emojis::get(g).is_some() {
        return true;
    }
    let mut it = g.chars();
    match (it.next(), it.next()) {
        // Single scalar written without its variation selector (e.g. ❤ for ❤️).
        (Some(c), None) => {
            let mut qualified = String::with_capacity(8);
            qualified.push(c);
            qualified.push('\u{FE0F}');
            emojis::get(&qualified).is_some()
        }
        // Multi-scalar cluster carrying stray selectors the registry omits.
        _ if g.contains('\u{FE0F}') => {
            let stripped: String = g.chars().filter(|&c| c != '\u{FE0F}').collect();
            emojis::get(&stripped).is_some()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_plain_emojis_in_order() {
        assert_eq!(emoji_glyphs("go 🚀 team 🎉🎉"), vec!["🚀", "🎉", "🎉"]);
    }

    #[test]
    fn ignores_plain_text_and_digits() {
        assert!(emoji_glyphs("just words, digits 123 and #tags").is_empty());
    }

    #[test]
    fn zwj_sequence_is_one_glyph() {
        assert_eq!(emoji_glyphs("👨‍👩‍👧 family"), vec!["👨‍👩‍👧"]);
    }

    #[test]
    fn flag_is_one_glyph() {
        assert_eq!(emoji_glyphs("vamos 🇺🇾"), vec!["🇺🇾"]);
    }

    #[test]
    fn unqualified_heart_is_recognized() {
        assert_eq!(emoji_glyphs("te amo \u{2764}"), vec!["\u{2764}"]);
        assert_eq!(emoji_glyphs("te amo \u{2764}\u{FE0F}"), vec!["\u{2764}\u{FE0F}"]);
    }
}
